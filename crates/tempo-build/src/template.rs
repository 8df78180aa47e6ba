//! Gate templates.

use std::fmt;
use std::sync::Arc;

use tempo_ir::{ParamKey, Value};

use crate::args::{ArgName, ArgSource, GateArgs};
use crate::builder::Builder;
use crate::error::BuildResult;

/// A resolved gate request handed to an [`Insertion`].
#[derive(Debug, Clone)]
pub struct GateCall {
    /// The alias the gate was requested under.
    pub gate: String,
    pub qubits: Vec<String>,
    /// Timestamp of the operation inside its window.
    pub time: f64,
    /// Circuit arguments merged with the caller's overrides.
    pub args: GateArgs,
}

impl GateCall {
    /// A float argument that must be set.
    pub fn float(&self, name: ArgName) -> BuildResult<f64> {
        self.args
            .float(name)
            .ok_or_else(|| crate::error::BuildError::missing(&self.gate, name.name()))
    }

    /// A float argument that defaults to zero when unset.
    pub fn float_or_zero(&self, name: ArgName) -> f64 {
        self.args.float(name).unwrap_or(0.0)
    }

    /// A text argument that must be set.
    pub fn text(&self, name: ArgName) -> BuildResult<&str> {
        self.args
            .text(name)
            .ok_or_else(|| crate::error::BuildError::missing(&self.gate, name.name()))
    }
}

/// How a gate turns into circuit operations.
///
/// Natives emit a single operation, composites issue further gate requests
/// through the builder, and specialized insertions take full control of
/// emission.
pub trait Insertion: Send + Sync + fmt::Debug {
    /// Emit the operations for `call`.
    fn insert(&self, builder: &mut Builder, call: &GateCall) -> BuildResult<()>;
}

/// Static description of a gate kind.
#[derive(Debug, Clone)]
pub struct GateTemplate {
    name: String,
    arity: usize,
    gate_time: ArgSource,
    exec_time: Option<ArgSource>,
    circuit_args: Vec<(ArgName, ArgSource)>,
    user_args: Vec<ArgName>,
    insertion: Arc<dyn Insertion>,
}

impl GateTemplate {
    /// Create a template with zero gate time and no arguments.
    pub fn new(name: impl Into<String>, arity: usize, insertion: impl Insertion + 'static) -> Self {
        Self {
            name: name.into(),
            arity,
            gate_time: ArgSource::Literal(Value::Float(0.0)),
            exec_time: None,
            circuit_args: Vec::new(),
            user_args: Vec::new(),
            insertion: Arc::new(insertion),
        }
    }

    /// Take the gate duration from a qubit parameter.
    #[must_use]
    pub fn with_gate_time(mut self, key: ParamKey) -> Self {
        self.gate_time = ArgSource::Inherit(key);
        self
    }

    /// Place the operation at a fixed offset from the window start instead
    /// of the window midpoint.
    #[must_use]
    pub fn with_exec_time(mut self, offset: f64) -> Self {
        self.exec_time = Some(ArgSource::Literal(Value::Float(offset)));
        self
    }

    /// Pass a qubit parameter through as a circuit argument.
    #[must_use]
    pub fn inherit(mut self, name: ArgName, key: ParamKey) -> Self {
        self.circuit_args.push((name, ArgSource::Inherit(key)));
        self
    }

    /// Set a circuit argument to a fixed value.
    #[must_use]
    pub fn literal(mut self, name: ArgName, value: impl Into<Value>) -> Self {
        self.circuit_args.push((name, ArgSource::Literal(value.into())));
        self
    }

    /// Declare the arguments the caller must supply, in positional order.
    #[must_use]
    pub fn with_user_args(mut self, args: &[ArgName]) -> Self {
        self.user_args = args.to_vec();
        self
    }

    /// Library name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    pub fn gate_time(&self) -> &ArgSource {
        &self.gate_time
    }

    pub fn exec_time(&self) -> Option<&ArgSource> {
        self.exec_time.as_ref()
    }

    pub fn circuit_args(&self) -> &[(ArgName, ArgSource)] {
        &self.circuit_args
    }

    pub fn user_args(&self) -> &[ArgName] {
        &self.user_args
    }

    pub fn insertion(&self) -> &Arc<dyn Insertion> {
        &self.insertion
    }

    /// Whether `name` is a declared user or circuit argument.
    pub fn accepts(&self, name: ArgName) -> bool {
        self.user_args.contains(&name) || self.circuit_args.iter().any(|(n, _)| *n == name)
    }
}
