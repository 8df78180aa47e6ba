//! Gate requests in structured, flat, and text form.

use tempo_ir::Value;

use crate::args::GateArgs;
use crate::error::{BuildError, BuildResult};
use crate::registry::TemplateRegistry;
use crate::template::GateTemplate;

/// One positional field of a flat request.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestItem {
    Text(String),
    Float(f64),
}

impl RequestItem {
    fn text(&self) -> Option<&str> {
        match self {
            RequestItem::Text(s) => Some(s),
            RequestItem::Float(_) => None,
        }
    }
}

impl From<&str> for RequestItem {
    fn from(s: &str) -> Self {
        RequestItem::Text(s.to_string())
    }
}

impl From<f64> for RequestItem {
    fn from(v: f64) -> Self {
        RequestItem::Float(v)
    }
}

impl From<RequestItem> for Value {
    fn from(item: RequestItem) -> Self {
        match item {
            RequestItem::Text(s) => Value::Text(s),
            RequestItem::Float(v) => Value::Float(v),
        }
    }
}

/// A gate request with positional user arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct GateRequest {
    pub gate: String,
    pub qubits: Vec<String>,
    /// Values for the template's user arguments, in declaration order.
    pub args: Vec<Value>,
}

impl GateRequest {
    pub fn new(gate: impl Into<String>, qubits: &[&str]) -> Self {
        Self {
            gate: gate.into(),
            qubits: qubits.iter().map(|q| q.to_string()).collect(),
            args: Vec::new(),
        }
    }

    /// Append a positional argument.
    #[must_use]
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.args.push(value.into());
        self
    }

    /// Parse `(gate, q0, [q1], arg0, ...)`.
    ///
    /// The field count must be exactly one plus the gate's arity plus its
    /// number of user arguments.
    pub fn from_flat(items: &[RequestItem], registry: &TemplateRegistry) -> BuildResult<Self> {
        let gate = items
            .first()
            .and_then(RequestItem::text)
            .ok_or_else(|| BuildError::malformed(format!("{items:?}"), "missing gate name"))?;
        let template = registry.lookup(gate)?;
        expect_fields(gate, template, items.len())?;

        let (qubits, args) = items[1..].split_at(template.arity());
        let qubits = qubits
            .iter()
            .map(|item| {
                item.text()
                    .map(str::to_string)
                    .ok_or_else(|| BuildError::malformed(gate, "qubit names must be text"))
            })
            .collect::<BuildResult<Vec<_>>>()?;

        Ok(Self {
            gate: gate.to_string(),
            qubits,
            args: args.iter().cloned().map(Value::from).collect(),
        })
    }

    /// Parse a text line `GATE [args] q0 [q1]`.
    ///
    /// Arguments come before qubits. Tokens that parse as numbers become
    /// floats, everything else text. `measure q -> c;` reads the qubit into
    /// output bit `c`.
    pub fn parse_line(line: &str, registry: &TemplateRegistry) -> BuildResult<Self> {
        let tokens: Vec<&str> = line
            .trim()
            .trim_end_matches(';')
            .split_whitespace()
            .collect();
        let Some((&gate, rest)) = tokens.split_first() else {
            return Err(BuildError::malformed(line, "empty request"));
        };

        if gate == "measure" {
            return match rest {
                [qubit, "->", bit] => Ok(Self::new("Measure", &[*qubit]).arg(*bit)),
                _ => Err(BuildError::malformed(line, "expected 'measure q -> c;'")),
            };
        }

        let template = registry.lookup(gate)?;
        expect_fields(gate, template, tokens.len())?;
        let (args, qubits) = rest.split_at(template.user_args().len());

        Ok(Self {
            gate: gate.to_string(),
            qubits: qubits.iter().map(|q| q.to_string()).collect(),
            args: args.iter().map(|token| parse_token(token)).collect(),
        })
    }

    /// Match positional arguments to the template's declared user arguments.
    pub fn named_args(&self, template: &GateTemplate) -> BuildResult<GateArgs> {
        let names = template.user_args();
        if names.len() != self.args.len() {
            return Err(BuildError::malformed(
                &self.gate,
                format!("expected {} arguments, got {}", names.len(), self.args.len()),
            ));
        }
        Ok(names.iter().copied().zip(self.args.iter().cloned()).collect())
    }
}

fn expect_fields(gate: &str, template: &GateTemplate, got: usize) -> BuildResult<()> {
    let expected = 1 + template.arity() + template.user_args().len();
    if got != expected {
        return Err(BuildError::malformed(
            gate,
            format!("expected {expected} fields, got {got}"),
        ));
    }
    Ok(())
}

fn parse_token(token: &str) -> Value {
    token
        .parse::<f64>()
        .map_or_else(|_| Value::Text(token.to_string()), Value::Float)
}
