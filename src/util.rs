/// Reports that the links between the nodes of a container are broken.
///
/// With `unwind_safety` the process is aborted instead of panicking, so that no unwinder gets to
/// observe the container.
#[cold]
#[inline(never)]
#[track_caller]
pub(crate) fn corrupted(msg: &str) -> ! {
    #[cfg(feature = "unwind_safety")]
    {
        std::eprintln!("container corrupted: {}", msg);
        std::process::abort()
    }
    #[cfg(not(feature = "unwind_safety"))]
    {
        panic!("container corrupted: {}", msg)
    }
}

/// Unwraps a link which the invariants of the container require to be present.
#[inline]
#[track_caller]
pub(crate) fn expect_link<K>(link: Option<K>, msg: &str) -> K {
    match link {
        Some(key) => key,
        None => corrupted(msg),
    }
}
