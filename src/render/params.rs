use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;
use tera::Context;

use super::RenderError;

/// Parameters bound into a view
#[derive(Debug, Clone, Default)]
pub enum ViewParams {
    #[default]
    None,
    Structured(Context),
}

impl ViewParams {
    /// Bind the fields of a serializable struct (or map) as view parameters
    pub fn from_serialize<T: Serialize>(value: &T) -> Result<Self, RenderError> {
        Ok(Self::Structured(Context::from_serialize(value)?))
    }

    /// Loosely-typed parameters. An absent or empty map means no parameters.
    pub fn from_map(map: Option<HashMap<String, Value>>) -> Self {
        match map {
            Some(map) if !map.is_empty() => {
                let mut context = Context::new();
                for (key, value) in map {
                    context.insert(key, &value);
                }
                Self::Structured(context)
            }
            _ => Self::None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

impl From<Context> for ViewParams {
    fn from(context: Context) -> Self {
        Self::Structured(context)
    }
}

/// A named template plus the parameters to render it with
#[derive(Debug, Clone)]
pub struct View {
    name: String,
    params: ViewParams,
}

impl View {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: ViewParams::None,
        }
    }

    pub fn with_params(mut self, params: impl Into<ViewParams>) -> Self {
        self.params = params.into();
        self
    }

    pub fn with_map(self, map: Option<HashMap<String, Value>>) -> Self {
        self.with_params(ViewParams::from_map(map))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &ViewParams {
        &self.params
    }

    pub(super) fn into_parts(self) -> (String, ViewParams) {
        (self.name, self.params)
    }
}
