use core::{fmt, mem};

/**
The body of a short option cluster, such as the `abc` in `-abc`. A cluster is
statically guaranteed to hold at least one character.
*/
#[derive(PartialEq, Eq)]
#[repr(transparent)]
pub struct Cluster(str);

impl Cluster {
    /// SAFETY: the string must not be empty
    #[inline(always)]
    unsafe fn new_unchecked(body: &str) -> &Self {
        debug_assert!(!body.is_empty());

        // SAFETY: Cluster is repr transparent to a str, so it's safe to
        // transmute into it.
        unsafe { mem::transmute(body) }
    }

    #[inline]
    pub fn new(body: &str) -> Option<&Self> {
        match body.is_empty() {
            true => None,
            // Safety: we just confirmed that the string is non-empty
            false => Some(unsafe { Self::new_unchecked(body) }),
        }
    }

    /// Iterate over the options in this cluster. Each item is an option
    /// character along with whatever follows it in the cluster, which is
    /// the inline value if that option turns out to need one.
    #[inline]
    pub fn options(&self) -> Options<'_> {
        Options { rest: &self.0 }
    }

    #[inline(always)]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "-{:?}", &self.0)
    }
}

/// Iterator over the options in a [`Cluster`]; see [`Cluster::options`].
#[derive(Debug, Clone)]
pub struct Options<'a> {
    rest: &'a str,
}

impl<'a> Iterator for Options<'a> {
    type Item = (char, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        let mut chars = self.rest.chars();
        let option = chars.next()?;
        self.rest = chars.as_str();

        Some((option, self.rest))
    }
}
