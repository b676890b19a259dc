//! Handler registration.

use std::collections::HashMap;

use hypatia_config::HypatiaConfig;
use hypatia_core::{SignatureOptions, SignatureResult};
use hypatia_docs::{DocsResult, OpenApi, OpenApiGenerator};
use hypatia_signature::{Signature, ViewSignature};
use tracing::info;

/// A handler registered under an HTTP method.
#[derive(Debug, Clone)]
pub struct RegisteredView {
    method: String,
    view: ViewSignature,
}

impl RegisteredView {
    /// The HTTP method, upper-cased.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// The analysed signature.
    #[must_use]
    pub fn view(&self) -> &ViewSignature {
        &self.view
    }
}

/// Analyses handlers as they are registered and keeps the results.
///
/// Every handler is analysed exactly once, with the signature options of
/// the registry's configuration.
///
/// # Example
///
/// ```rust
/// use hypatia::prelude::*;
///
/// let mut registry = ViewRegistry::new();
/// registry
///     .register("GET", "/items/{item_id}", Signature::new("get_item")
///         .param(Parameter::new("item_id").annotated(TypeRef::Int)))
///     .unwrap();
///
/// assert_eq!(registry.len(), 1);
/// assert!(registry.get("get_item").is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ViewRegistry {
    options: SignatureOptions,
    views: Vec<RegisteredView>,
    by_handler: HashMap<String, usize>,
}

impl ViewRegistry {
    /// Creates a registry with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry using the signature options of `config`.
    #[must_use]
    pub fn with_config(config: &HypatiaConfig) -> Self {
        Self::with_options(config.signature)
    }

    /// Creates a registry with explicit options.
    #[must_use]
    pub fn with_options(options: SignatureOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// The options every handler is analysed with.
    #[must_use]
    pub fn options(&self) -> &SignatureOptions {
        &self.options
    }

    /// Analyses `signature` for `path` and stores it under `method`.
    ///
    /// A later registration with the same handler name replaces the lookup
    /// entry; both remain in [`views`](Self::views).
    ///
    /// # Errors
    ///
    /// Returns the analysis error unchanged.
    pub fn register(
        &mut self,
        method: &str,
        path: &str,
        signature: Signature,
    ) -> SignatureResult<&ViewSignature> {
        let view = ViewSignature::with_options(path, signature, self.options)?;
        info!(
            method = %method,
            path = %path,
            handler = %view.handler(),
            schemas = view.models().len(),
            "registered handler"
        );

        let index = self.views.len();
        self.by_handler.insert(view.handler().to_string(), index);
        self.views.push(RegisteredView {
            method: method.to_uppercase(),
            view,
        });
        Ok(&self.views[index].view)
    }

    /// Looks up a registered handler by name.
    #[must_use]
    pub fn get(&self, handler: &str) -> Option<&ViewSignature> {
        self.by_handler
            .get(handler)
            .map(|&index| &self.views[index].view)
    }

    /// All registrations, in order.
    #[must_use]
    pub fn views(&self) -> &[RegisteredView] {
        &self.views
    }

    /// Number of registrations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.views.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// Documents every registration with `generator`.
    ///
    /// # Errors
    ///
    /// Returns the first documentation error.
    pub fn openapi(&self, generator: OpenApiGenerator) -> DocsResult<OpenApi> {
        let mut generator = generator;
        for registered in &self.views {
            generator.add_route(&registered.method, &registered.view)?;
        }
        Ok(generator.generate())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hypatia_core::{PathParamPolicy, SignatureError, TypeRef};
    use hypatia_signature::Parameter;

    #[test]
    fn test_register_and_lookup() {
        let mut registry = ViewRegistry::new();
        assert!(registry.is_empty());

        registry
            .register(
                "get",
                "/items/{item_id}",
                Signature::new("get_item").param(Parameter::new("item_id").annotated(TypeRef::Int)),
            )
            .unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.views()[0].method(), "GET");
        assert_eq!(registry.get("get_item").unwrap().path_params(), ["item_id"]);
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn test_config_options_applied() {
        let mut registry = ViewRegistry::with_config(&HypatiaConfig::production());
        assert_eq!(registry.options().path_params, PathParamPolicy::Deny);

        let err = registry
            .register("GET", "/items/{item_id}", Signature::new("list_items"))
            .unwrap_err();
        assert!(matches!(err.root(), SignatureError::MissingPathParams { .. }));
        assert!(registry.is_empty());
    }
}
