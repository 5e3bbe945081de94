use libfuzzer_sys::arbitrary::{self, Arbitrary};
use url_archive::QueryParams;

#[derive(Arbitrary, Clone, Debug)]
pub enum Op<'a> {
    Set(&'a str, &'a str),
    SetRaw(&'a str, &'a str),
    Remove(&'a str),
    Clear,
}

/// A naive model of an ordered parameter store: a list of unique names.
#[derive(Default, Debug)]
pub struct Model<'a>(Vec<(&'a str, &'a str)>);

impl<'a> Model<'a> {
    pub fn apply(&mut self, op: &Op<'a>) {
        match *op {
            Op::Set(name, value) | Op::SetRaw(name, value) => {
                match self.0.iter_mut().find(|(n, _)| *n == name) {
                    Some(entry) => entry.1 = value,
                    None => self.0.push((name, value)),
                }
            }
            Op::Remove(name) => self.0.retain(|(n, _)| *n != name),
            Op::Clear => self.0.clear(),
        }
    }

    pub fn check(&self, params: &QueryParams) {
        assert_eq!(params.len(), self.0.len());
        for (param, (name, value)) in params.iter().zip(&self.0) {
            assert_eq!(param.name(), *name);
            assert_eq!(param.value(), *value);
        }
    }
}

pub fn apply(params: &mut QueryParams, op: &Op<'_>) {
    match *op {
        Op::Set(name, value) => params.set(name, value),
        Op::SetRaw(name, value) => params.set_raw(name, value),
        Op::Remove(name) => {
            params.remove(name);
        }
        Op::Clear => params.clear(),
    }
}
