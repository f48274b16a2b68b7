//! Callbacks carried by prop bundles

use std::fmt;
use std::sync::Arc;

/// A shareable event handler taking `A`.
///
/// # Example
///
/// ```
/// use table_batteries::callback::Callback;
///
/// let on_set_page = Callback::new(|page: usize| println!("page {page}"));
/// on_set_page.call(2);
/// ```
pub struct Callback<A>(Arc<dyn Fn(A) + Send + Sync>);

impl<A> Callback<A> {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(A) + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn call(&self, arg: A) {
        (self.0)(arg)
    }
}

impl<A> Clone for Callback<A> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<A> fmt::Debug for Callback<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Callback")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::StateCell;

    #[test]
    fn test_clones_share_handler() {
        let calls = StateCell::new(0usize);
        let counter = calls.clone();
        let callback = Callback::new(move |n: usize| counter.update(|c| *c += n));
        callback.clone().call(2);
        callback.call(3);
        assert_eq!(calls.get(), 5);
    }
}
