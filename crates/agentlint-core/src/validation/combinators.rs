//! Combinators for building checks out of checks.
//!
//! All combinators are associative in the obvious way: `all(vec![a, all(vec![b, c])])`
//! reports the same messages as `all(vec![a, b, c])`.

use super::{CURRENT_KEY, CheckContext, DynCheck, Outcome, check_fn};
use serde_json::Value;

/// Run checks in order and stop at the first invalid outcome. Warnings from
/// every check that ran, including the failing one, are kept.
pub fn sequence(checks: Vec<DynCheck>) -> DynCheck {
    check_fn(move |value, ctx: &mut CheckContext| {
        let mut outcome = Outcome::ok();
        for check in &checks {
            let step = check.check(value, ctx);
            let failed = !step.valid;
            outcome.merge(step);
            if failed {
                break;
            }
        }
        outcome
    })
}

/// Skip `inner` when the value is null or absent.
pub fn optional(inner: DynCheck) -> DynCheck {
    check_fn(move |value, ctx: &mut CheckContext| {
        if value.is_null() {
            Outcome::ok()
        } else {
            inner.check(value, ctx)
        }
    })
}

/// Delegate to `inner` only when `predicate` holds.
pub fn when<P>(predicate: P, inner: DynCheck) -> DynCheck
where
    P: Fn(&Value, &CheckContext) -> bool + Send + Sync + 'static,
{
    check_fn(move |value, ctx: &mut CheckContext| {
        if predicate(value, ctx) {
            inner.check(value, ctx)
        } else {
            Outcome::ok()
        }
    })
}

/// Run every check and accumulate all messages. Valid iff every check is.
pub fn all(checks: Vec<DynCheck>) -> DynCheck {
    check_fn(move |value, ctx: &mut CheckContext| {
        let mut outcome = Outcome::ok();
        for check in &checks {
            outcome.merge(check.check(value, ctx));
        }
        outcome
    })
}

/// Run every check; valid with no errors if at least one check is valid,
/// otherwise invalid with every error concatenated.
pub fn any(checks: Vec<DynCheck>) -> DynCheck {
    check_fn(move |value, ctx: &mut CheckContext| {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        let mut matched = false;
        for check in &checks {
            let step = check.check(value, ctx);
            matched |= step.valid;
            errors.extend(step.errors);
            warnings.extend(step.warnings);
        }
        if matched {
            errors.clear();
        }
        Outcome {
            valid: matched,
            errors,
            warnings,
        }
    })
}

/// Apply `inner` to every array element. Non-arrays and empty arrays pass.
pub fn each(inner: DynCheck) -> DynCheck {
    check_fn(move |value, ctx: &mut CheckContext| {
        let mut outcome = Outcome::ok();
        if let Some(items) = value.as_array() {
            for (idx, item) in items.iter().enumerate() {
                ctx.enter(format!("[{}]", idx));
                outcome.merge(inner.check(item, ctx));
                ctx.leave();
            }
        }
        outcome
    })
}

/// Apply `inner` to every value of an object. The key being visited is
/// available as `ctx.shared_state[CURRENT_KEY]`.
pub fn each_value(inner: DynCheck) -> DynCheck {
    check_fn(move |value, ctx: &mut CheckContext| {
        let mut outcome = Outcome::ok();
        if let Some(map) = value.as_object() {
            let previous = ctx.shared_state.remove(CURRENT_KEY);
            for (key, item) in map {
                ctx.shared_state
                    .insert(CURRENT_KEY.to_string(), Value::String(key.clone()));
                ctx.enter(key.clone());
                outcome.merge(inner.check(item, ctx));
                ctx.leave();
            }
            match previous {
                Some(prev) => ctx.shared_state.insert(CURRENT_KEY.to_string(), prev),
                None => ctx.shared_state.remove(CURRENT_KEY),
            };
        }
        outcome
    })
}

/// Transform the value before delegating to `inner`.
pub fn map_then<T>(transform: T, inner: DynCheck) -> DynCheck
where
    T: Fn(&Value) -> Value + Send + Sync + 'static,
{
    check_fn(move |value, ctx: &mut CheckContext| {
        let mapped = transform(value);
        inner.check(&mapped, ctx)
    })
}

/// Apply `inner` to the object member `key` (`null` when absent).
pub fn field(key: &str, inner: DynCheck) -> DynCheck {
    let key = key.to_string();
    check_fn(move |value, ctx: &mut CheckContext| {
        let member = value.get(&key).unwrap_or(&Value::Null);
        ctx.enter(key.clone());
        let outcome = inner.check(member, ctx);
        ctx.leave();
        outcome
    })
}
