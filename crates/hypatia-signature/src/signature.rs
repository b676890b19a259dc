//! The view signature facade.
//!
//! [`ViewSignature::new`] runs the whole analysis. The steps are also
//! exposed as a typestate builder so callers can stop after any of them:
//!
//! ```text
//! SignatureBuilder<Unbuilt>
//!     .classify()   -> SignatureBuilder<ParametersClassified>
//!     .synthesize() -> SignatureBuilder<ModelsSynthesized>
//!     .validate()   -> ViewSignature
//! ```
//!
//! # Example
//!
//! ```
//! use hypatia_core::{fixtures, SourceKind, TypeRef};
//! use hypatia_signature::{Parameter, Signature, ViewSignature};
//!
//! let signature = Signature::new("update_item")
//!     .param(Parameter::new("request"))
//!     .param(Parameter::new("item_id").annotated(TypeRef::Int))
//!     .param(Parameter::new("item").annotated(fixtures::item_model()));
//!
//! let view = ViewSignature::new("/items/{item_id}", signature).unwrap();
//! let kinds: Vec<_> = view.models().iter().map(|m| m.kind()).collect();
//! assert_eq!(kinds, vec![SourceKind::Request, SourceKind::Path, SourceKind::Body]);
//! assert_eq!(view.model(SourceKind::Body).unwrap().single_attr(), Some("item"));
//! ```

use hypatia_core::{PathParamPolicy, SignatureError, SignatureOptions, SignatureResult, SourceKind};
use hypatia_router::PathTemplate;
use indexmap::IndexMap;
use tracing::{debug, info_span, warn};

use crate::diagnostic::Diagnostic;
use crate::infer::{infer_source, FuncParam, InferContext};
use crate::reflect::{clean_docstring, ParameterKind, Signature, SourceLocation};
use crate::schema::SynthesizedSchema;

/// Builder state: nothing analysed yet.
#[derive(Debug)]
pub struct Unbuilt;

/// Builder state: every parameter is bound to a source.
#[derive(Debug)]
pub struct ParametersClassified {
    params: Vec<FuncParam>,
    has_kwargs: bool,
}

/// Builder state: one schema per source group.
#[derive(Debug)]
pub struct ModelsSynthesized {
    params: Vec<FuncParam>,
    has_kwargs: bool,
    models: Vec<SynthesizedSchema>,
}

/// Step-by-step signature analysis.
#[derive(Debug)]
pub struct SignatureBuilder<S> {
    signature: Signature,
    path: String,
    path_params: Vec<String>,
    options: SignatureOptions,
    state: S,
}

impl<S> SignatureBuilder<S> {
    fn advance<T>(self, state: T) -> SignatureBuilder<T> {
        SignatureBuilder {
            signature: self.signature,
            path: self.path,
            path_params: self.path_params,
            options: self.options,
            state,
        }
    }

    /// The handler being analysed.
    #[must_use]
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Parameter names declared by the path template, first-seen order.
    #[must_use]
    pub fn path_params(&self) -> &[String] {
        &self.path_params
    }
}

impl SignatureBuilder<Unbuilt> {
    /// Starts analysing `signature` bound to the `path` template.
    ///
    /// # Errors
    ///
    /// Returns [`hypatia_core::SignatureError::InvalidPathTemplate`] if the
    /// template does not parse.
    pub fn new(path: impl Into<String>, signature: Signature) -> SignatureResult<Self> {
        let path = path.into();
        let template = PathTemplate::parse(&path)
            .map_err(|e| SignatureError::from(e).for_handler(signature.name()))?;
        let path_params = template.param_names().into_iter().map(str::to_string).collect();

        Ok(Self {
            signature,
            path,
            path_params,
            options: SignatureOptions::default(),
            state: Unbuilt,
        })
    }

    /// Sets the analysis options.
    #[must_use]
    pub fn options(mut self, options: SignatureOptions) -> Self {
        self.options = options;
        self
    }

    /// Binds every declared and contributed parameter to a source.
    ///
    /// # Errors
    ///
    /// Returns [`hypatia_core::SignatureError::PathParamDefault`] if a path
    /// parameter declares a default.
    pub fn classify(self) -> SignatureResult<SignatureBuilder<ParametersClassified>> {
        let handler = self.signature.name();
        let ctx = InferContext::new(&self.path_params);
        let mut params = Vec::with_capacity(self.signature.params().len());
        let mut has_kwargs = false;

        for (position, param) in self.signature.params().iter().enumerate() {
            match param.kind {
                ParameterKind::VarKeyword => {
                    has_kwargs = true;
                    continue;
                }
                ParameterKind::VarPositional => continue,
                _ => {}
            }

            let classified =
                infer_source(position, param, &ctx).map_err(|e| e.for_handler(handler))?;
            debug!(
                param = %classified.param.name,
                alias = %classified.param.alias,
                kind = %classified.param.kind(),
                rule = %classified.rule,
                "classified parameter"
            );
            params.push(classified.param);
        }

        for contributed in self.signature.contributed() {
            let param = FuncParam::contributed(contributed);
            debug!(
                param = %param.name,
                kind = %param.kind(),
                "contributed parameter"
            );
            params.push(param);
        }

        Ok(self.advance(ParametersClassified { params, has_kwargs }))
    }
}

impl SignatureBuilder<ParametersClassified> {
    /// Bound parameters, declared first, then contributed.
    #[must_use]
    pub fn params(&self) -> &[FuncParam] {
        &self.state.params
    }

    /// Groups parameters by source and synthesizes one schema per group.
    ///
    /// # Errors
    ///
    /// Returns [`hypatia_core::SignatureError::DuplicateWireName`] if two
    /// parameters of one flat group share a wire name.
    pub fn synthesize(self) -> SignatureResult<SignatureBuilder<ModelsSynthesized>> {
        let handler = self.signature.name();
        let groups = group_by_source(&self.state.params);

        let mut models = Vec::with_capacity(groups.len());
        for (kind, args) in &groups {
            let schema = SynthesizedSchema::synthesize(*kind, args, &self.options)
                .map_err(|e| e.for_handler(handler))?;
            debug!(
                schema = schema.name(),
                fields = schema.fields().len(),
                collection_fields = ?schema.collection_fields(),
                "synthesized schema"
            );
            models.push(schema);
        }

        let ParametersClassified { params, has_kwargs } = self.state;
        let state = ModelsSynthesized {
            params,
            has_kwargs,
            models,
        };
        Ok(SignatureBuilder {
            signature: self.signature,
            path: self.path,
            path_params: self.path_params,
            options: self.options,
            state,
        })
    }
}

impl SignatureBuilder<ModelsSynthesized> {
    /// Synthesized schemas, in group order.
    #[must_use]
    pub fn models(&self) -> &[SynthesizedSchema] {
        &self.state.models
    }

    /// Cross-checks the path template against the path schema.
    ///
    /// # Errors
    ///
    /// Returns [`hypatia_core::SignatureError::MissingPathParams`] if path
    /// names are unread and the policy is [`PathParamPolicy::Deny`].
    pub fn validate(self) -> SignatureResult<ViewSignature> {
        let mut diagnostics = Vec::new();

        let missing = missing_path_params(&self.path_params, &self.state.models);
        if !missing.is_empty() {
            let diagnostic = Diagnostic::missing_path_params(
                self.signature.name(),
                missing,
                self.signature.location().cloned(),
            );
            match self.options.path_params {
                PathParamPolicy::Warn => {
                    warn!(
                        handler = %diagnostic.handler,
                        location = ?diagnostic.location.as_ref().map(ToString::to_string),
                        "{}",
                        diagnostic.message
                    );
                    diagnostics.push(diagnostic);
                }
                PathParamPolicy::Deny => return Err(diagnostic.into_error()),
                PathParamPolicy::Ignore => {}
            }
        }

        let ModelsSynthesized {
            params,
            has_kwargs,
            models,
        } = self.state;

        Ok(ViewSignature {
            handler: self.signature.name().to_string(),
            docstring: clean_docstring(self.signature.docstring().unwrap_or_default()),
            location: self.signature.location().cloned(),
            path: self.path,
            path_params: self.path_params,
            options: self.options,
            has_kwargs,
            params,
            models,
            diagnostics,
        })
    }
}

/// Groups parameters by kind, first-seen order. A body group sharing the
/// handler with file or form groups moves to the multipart body group.
fn group_by_source(params: &[FuncParam]) -> IndexMap<SourceKind, Vec<FuncParam>> {
    let mut groups: IndexMap<SourceKind, Vec<FuncParam>> = IndexMap::new();
    for param in params {
        groups.entry(param.kind()).or_default().push(param.clone());
    }

    let is_multipart = groups.contains_key(&SourceKind::Body)
        && (groups.contains_key(&SourceKind::File) || groups.contains_key(&SourceKind::Form));
    if is_multipart {
        if let Some(body) = groups.shift_remove(&SourceKind::Body) {
            let retagged = body.into_iter().map(|mut param| {
                param.source = param.source.retagged(SourceKind::MultipartBody);
                param
            });
            groups
                .entry(SourceKind::MultipartBody)
                .or_default()
                .extend(retagged);
        }
    }

    groups
}

/// Sorted path names the path schema does not read.
fn missing_path_params(path_params: &[String], models: &[SynthesizedSchema]) -> Vec<String> {
    let path_map = models
        .iter()
        .find(|m| m.kind() == SourceKind::Path)
        .and_then(SynthesizedSchema::flatten_map);

    let mut missing: Vec<String> = path_params
        .iter()
        .filter(|name| !path_map.is_some_and(|map| map.contains(name)))
        .cloned()
        .collect();
    missing.sort();
    missing.dedup();
    missing
}

/// The analysed signature of one handler bound to one path.
///
/// Immutable once built; shared freely between request tasks.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewSignature {
    handler: String,
    path: String,
    path_params: Vec<String>,
    docstring: String,
    location: Option<SourceLocation>,
    options: SignatureOptions,
    has_kwargs: bool,
    params: Vec<FuncParam>,
    models: Vec<SynthesizedSchema>,
    diagnostics: Vec<Diagnostic>,
}

impl ViewSignature {
    /// Analyses `signature` bound to `path` with default options.
    ///
    /// # Errors
    ///
    /// See [`ViewSignature::with_options`].
    pub fn new(path: impl Into<String>, signature: Signature) -> SignatureResult<Self> {
        Self::with_options(path, signature, SignatureOptions::default())
    }

    /// Analyses `signature` bound to `path`.
    ///
    /// # Errors
    ///
    /// Returns a [`hypatia_core::SignatureError`] for an unparsable path
    /// template, a defaulted path parameter, clashing wire names, or (under
    /// [`PathParamPolicy::Deny`]) unread path names.
    pub fn with_options(
        path: impl Into<String>,
        signature: Signature,
        options: SignatureOptions,
    ) -> SignatureResult<Self> {
        let path = path.into();
        let span = info_span!("view_signature", handler = signature.name(), path = %path);
        let _enter = span.enter();

        SignatureBuilder::new(path, signature)?
            .options(options)
            .classify()?
            .synthesize()?
            .validate()
    }

    /// Handler name.
    #[must_use]
    pub fn handler(&self) -> &str {
        &self.handler
    }

    /// Path template.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Names declared by the path template.
    #[must_use]
    pub fn path_params(&self) -> &[String] {
        &self.path_params
    }

    /// Cleaned docstring; empty if none.
    #[must_use]
    pub fn docstring(&self) -> &str {
        &self.docstring
    }

    /// Where the handler is defined.
    #[must_use]
    pub fn location(&self) -> Option<&SourceLocation> {
        self.location.as_ref()
    }

    /// Options the signature was analysed with.
    #[must_use]
    pub const fn options(&self) -> &SignatureOptions {
        &self.options
    }

    /// True if the handler accepts `**kwargs`.
    #[must_use]
    pub const fn has_kwargs(&self) -> bool {
        self.has_kwargs
    }

    /// Bound parameters.
    #[must_use]
    pub fn params(&self) -> &[FuncParam] {
        &self.params
    }

    /// Synthesized schemas, in group order.
    #[must_use]
    pub fn models(&self) -> &[SynthesizedSchema] {
        &self.models
    }

    /// The schema for `kind`, if the handler reads from it.
    #[must_use]
    pub fn model(&self, kind: SourceKind) -> Option<&SynthesizedSchema> {
        self.models.iter().find(|m| m.kind() == kind)
    }

    /// Non-fatal findings.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}
