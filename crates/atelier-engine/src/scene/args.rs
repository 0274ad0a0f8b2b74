use std::collections::BTreeMap;

use crate::paint::ColorArg;

/// Value stored under a command argument name.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Num(f64),
    Nums(Vec<f64>),
    Color(ColorArg),
    Bool(bool),
    Text(String),
    /// Explicitly absent (e.g. `fill` after `no_fill()`).
    None,
}

impl From<f64> for ArgValue {
    fn from(v: f64) -> Self {
        ArgValue::Num(v)
    }
}

impl From<Vec<f64>> for ArgValue {
    fn from(v: Vec<f64>) -> Self {
        ArgValue::Nums(v)
    }
}

impl From<ColorArg> for ArgValue {
    fn from(c: ColorArg) -> Self {
        ArgValue::Color(c)
    }
}

impl From<Option<ColorArg>> for ArgValue {
    fn from(c: Option<ColorArg>) -> Self {
        c.map_or(ArgValue::None, ArgValue::Color)
    }
}

impl From<bool> for ArgValue {
    fn from(v: bool) -> Self {
        ArgValue::Bool(v)
    }
}

impl From<&str> for ArgValue {
    fn from(v: &str) -> Self {
        ArgValue::Text(v.to_string())
    }
}

/// Name → value argument map of a command.
///
/// Ordered so debug output and equality are deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args(BTreeMap<String, ArgValue>);

impl Args {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[inline]
    pub fn with(mut self, name: &str, value: impl Into<ArgValue>) -> Self {
        self.insert(name, value);
        self
    }

    #[inline]
    pub fn insert(&mut self, name: &str, value: impl Into<ArgValue>) {
        self.0.insert(name.to_string(), value.into());
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.0.get(name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArgValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Finite number stored under `name`.
    pub fn num(&self, name: &str) -> Option<f64> {
        match self.get(name) {
            Some(ArgValue::Num(v)) if v.is_finite() => Some(*v),
            _ => None,
        }
    }

    pub fn nums(&self, name: &str) -> Option<&[f64]> {
        match self.get(name) {
            Some(ArgValue::Nums(v)) => Some(v),
            _ => None,
        }
    }

    /// Color under `name`.
    ///
    /// Accepts a `Color`, a grayscale scalar, or a 1-4 element channel list.
    /// `Some(None)` means the key is present but explicitly disabled.
    pub fn color(&self, name: &str) -> Option<Option<ColorArg>> {
        match self.get(name)? {
            ArgValue::Color(c) => Some(Some(*c)),
            ArgValue::Num(v) => Some(Some(ColorArg::Gray(*v))),
            ArgValue::Nums(v) => ColorArg::from_channels(v).map(Some),
            ArgValue::None => Some(None),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn num_rejects_non_finite_and_wrong_type() {
        let args = Args::new()
            .with("x", 1.5)
            .with("nan", f64::NAN)
            .with("label", "hi");
        assert_eq!(args.num("x"), Some(1.5));
        assert_eq!(args.num("nan"), None);
        assert_eq!(args.num("label"), None);
        assert_eq!(args.num("missing"), None);
    }

    #[test]
    fn color_accepts_scalar_list_and_none() {
        let args = Args::new()
            .with("gray", 12.0)
            .with("rgb", vec![1.0, 2.0, 3.0])
            .with("off", ArgValue::None)
            .with("bad", vec![1.0; 7]);
        assert_eq!(args.color("gray"), Some(Some(ColorArg::Gray(12.0))));
        assert_eq!(args.color("rgb"), Some(Some(ColorArg::Rgb(1.0, 2.0, 3.0))));
        assert_eq!(args.color("off"), Some(None));
        assert_eq!(args.color("bad"), None);
        assert_eq!(args.color("missing"), None);
    }
}
