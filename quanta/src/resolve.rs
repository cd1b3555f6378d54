//! Query resolution
//!
//! Splits a normalized query into quantity, source unit and optional target
//! keyword, evaluates the quantity and picks the target units. Anything
//! that does not resolve degrades: an unknown unit makes the query
//! unit-less arithmetic, and an expression that does not evaluate loses its
//! last whitespace-separated token until something does.

use quanta_core::Number;
use quanta_eval::{balance_parentheses, evaluate, rewrite_integer_literals, EvalError};
use quanta_units::{Unit, UnitRegistry};
use regex::{Captures, Regex};
use std::sync::LazyLock;
use tracing::debug;

const SOURCE: &str = r"^(?P<quantity>.*[\d.]+)\s*(?P<from>[^\d\s](?:[^\s]*|.+?))";
const TARGET: &str = r"(?:\s+as|\s+to|\s+in|\s*>|\s*=)\s(?P<to>[^\d\s][^\s]*)";

static SOURCE_RE: LazyLock<Regex> = LazyLock::new(|| compile(&format!("(?i){SOURCE}$")));

static FULL_RE: LazyLock<Regex> = LazyLock::new(|| compile(&format!("(?i){SOURCE}{TARGET}$")));

/// A parenthesized arithmetic group written directly before a unit
static GROUP_BEFORE_UNIT_RE: LazyLock<Regex> =
    LazyLock::new(|| compile(r#"(^|[^\w.])\(([^()]*)\)(\s*[A-Za-z_"'%])"#));

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid pattern {pattern:?}: {e}"))
}

/// One resolved reading of a query
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion<'r> {
    pub from: Option<&'r Unit>,
    pub quantity: Number,
    pub to: Option<&'r Unit>,
}

impl<'r> Conversion<'r> {
    pub fn unitless(quantity: Number) -> Self {
        Conversion {
            from: None,
            quantity,
            to: None,
        }
    }

    pub fn is_unitless(&self) -> bool {
        self.from.is_none() || self.to.is_none()
    }
}

/// Resolve a normalized query against `registry`.
///
/// Always yields at least one conversion. A query that never evaluates
/// ends as a single unit-less zero.
pub fn resolve<'r>(registry: &'r UnitRegistry, query: &str) -> Vec<Conversion<'r>> {
    let mut query = precalculate(&open_unmatched_groups(rewrite_integer_literals(query)));

    loop {
        match attempt(registry, &query) {
            Ok(conversions) => return conversions,
            Err(err) => {
                let tokens: Vec<&str> = query.split_whitespace().collect();
                if tokens.len() <= 1 {
                    debug!(%err, query = %query, "nothing left to evaluate");
                    return vec![Conversion::unitless(Number::zero())];
                }
                let partial = tokens[..tokens.len() - 1].join(" ");
                debug!(%err, query = %query, partial = %partial, "retrying without last token");
                query = partial;
            }
        }
    }
}

/// Open the group a query closes without opening, so that
/// `1 + 2) mm` reads as `(1 + 2) mm`. Unclosed groups are left alone:
/// their missing `)` would otherwise land on the unit.
pub fn open_unmatched_groups(query: String) -> String {
    if query.matches(')').count() > query.matches('(').count() {
        balance_parentheses(query)
    } else {
        query
    }
}

/// Evaluate `(…)` groups that directly precede a unit, so that
/// `(10 * 20) mm` reads as `200 mm`. Groups that fail to evaluate are kept.
pub fn precalculate(query: &str) -> String {
    GROUP_BEFORE_UNIT_RE
        .replace_all(query, |caps: &Captures| match evaluate(&caps[2]) {
            Ok(value) if value.is_finite() => format!("{}{}{}", &caps[1], value, &caps[3]),
            _ => caps[0].to_string(),
        })
        .into_owned()
}

fn attempt<'r>(registry: &'r UnitRegistry, query: &str) -> Result<Vec<Conversion<'r>>, EvalError> {
    let parts = FULL_RE
        .captures(query)
        .map(|caps| (caps, true))
        .or_else(|| SOURCE_RE.captures(query).map(|caps| (caps, false)));

    if let Some((caps, has_target)) = parts {
        match registry.resolve(&caps["from"]) {
            Ok(from) => {
                let quantity = evaluate(&caps["quantity"])?;
                let keyword = if has_target { caps.name("to").map(|m| m.as_str()) } else { None };
                let tos = registry.compatible_units(from, keyword);
                if tos.is_empty() {
                    debug!(from = %from.id, keyword, "no compatible target units");
                    return Ok(vec![Conversion::unitless(quantity)]);
                }
                return Ok(tos
                    .into_iter()
                    .map(|to| Conversion {
                        from: Some(from),
                        quantity: quantity.clone(),
                        to: Some(to),
                    })
                    .collect());
            }
            Err(unknown) => debug!(%unknown, "treating query as unit-less"),
        }
    }

    Ok(vec![Conversion::unitless(evaluate(query)?)])
}
