#[cfg(feature = "core")]
#[doc(inline)]
pub use gsift_core as core;

#[cfg(feature = "search")]
#[doc(inline)]
pub use gsift_search as search;

#[cfg(feature = "select")]
#[doc(inline)]
pub use gsift_select as select;
