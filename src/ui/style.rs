use crate::data::settings::ColorScheme;
use std::collections::BTreeMap;
use std::fmt::Write as _;

pub const VAR_PRIMARY: &str = "--color-primary";
pub const VAR_PRIMARY_GLOW: &str = "--color-primary-glow";
pub const VAR_SECONDARY: &str = "--color-secondary";
pub const VAR_ACCENT: &str = "--color-accent";

/// Anything that accepts named style variables, e.g. a document root.
pub trait StyleTarget {
    fn set_property(&mut self, name: &str, value: &str);
}

pub fn apply_color_scheme<T: StyleTarget + ?Sized>(target: &mut T, colors: &ColorScheme) {
    target.set_property(VAR_PRIMARY, &colors.primary);
    target.set_property(VAR_PRIMARY_GLOW, &colors.primary_glow);
    target.set_property(VAR_SECONDARY, &colors.secondary);
    target.set_property(VAR_ACCENT, &colors.accent);
}

/// Style variables of the root presentation context.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RootStyle {
    vars: BTreeMap<String, String>,
}

impl RootStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn to_css(&self) -> String {
        let mut out = String::from(":root {\n");
        for (name, value) in &self.vars {
            let _ = writeln!(out, "  {name}: {value};");
        }
        out.push_str("}\n");
        out
    }
}

impl StyleTarget for RootStyle {
    fn set_property(&mut self, name: &str, value: &str) {
        self.vars.insert(name.to_string(), value.to_string());
    }
}
