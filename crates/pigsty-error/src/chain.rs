//! Rebuilding the throw sequence of nested errors.
//!
//! A single error cannot tell how it came to be. A [`StructuredError`] built with a cause can,
//! so following the cause links recreates the scene: the first failure, then every level that
//! caught and re-raised it.

use std::error::Error;

use crate::StructuredError;

/// Errors in the order they were raised, innermost (first thrown) first.
///
/// Only causes held by a [`StructuredError`] are followed; any other error ends the sequence.
pub fn ordered_causes<'a>(error: &'a (dyn Error + 'static)) -> Vec<&'a (dyn Error + 'static)> {
    if let Some(cause) = error
        .downcast_ref::<StructuredError>()
        .and_then(StructuredError::cause)
    {
        let mut causes = ordered_causes(cause);
        causes.push(error);
        return causes;
    }
    vec![error]
}

/// [`ordered_causes`] reversed: the last catcher first.
pub fn reverse_ordered_causes<'a>(
    error: &'a (dyn Error + 'static),
) -> Vec<&'a (dyn Error + 'static)> {
    let mut causes = ordered_causes(error);
    causes.reverse();
    causes
}
