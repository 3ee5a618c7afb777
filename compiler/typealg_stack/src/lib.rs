//! Stack growth for recursion over deeply nested types.
//!
//! Layout, classification, and synthesis all recurse structurally over type
//! descriptors, and the reference interpreter recurses over generated bodies.
//! A type like `[1][1][1]...int8` nested a few hundred thousand levels deep
//! would overflow a fixed thread stack, so every structural recursion goes
//! through [`ensure_sufficient_stack`].
//!
//! On wasm the call is a plain passthrough.

/// Grow the stack when less than this much remains (100KB).
const RED_ZONE: usize = 100 * 1024;

/// Size of each new stack segment (1MB).
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, first growing the stack if the red zone has been reached.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_depth_is_counted() {
        fn depth(n: u64) -> u64 {
            ensure_sufficient_stack(|| if n == 0 { 0 } else { depth(n - 1) + 1 })
        }

        // Well past what a default 8MB thread stack survives unaided.
        assert_eq!(depth(200_000), 200_000);
    }

    #[test]
    fn propagates_results() {
        let result: Result<u32, &str> = ensure_sufficient_stack(|| Err("no hash"));
        assert_eq!(result, Err("no hash"));
    }
}
