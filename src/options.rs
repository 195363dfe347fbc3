/// What to do when `beforebegin` or `afterend` is requested on a node
/// that has no parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParentlessInsertion {
    /// Do nothing.
    #[default]
    Ignore,
    /// Fail with [`Error::NoParent`](crate::Error::NoParent).
    Error,
}

/// Options for a [`Dom`](crate::Dom).
///
/// ```rust
/// use sugardom::{Dom, Options, ParentlessInsertion};
///
/// let dom = Dom::with_options(Options {
///     parentless_insertion: ParentlessInsertion::Error,
/// });
/// assert_eq!(dom.options().parentless_insertion, ParentlessInsertion::Error);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Options {
    pub parentless_insertion: ParentlessInsertion,
}
