use anyhow::Result;

/// Construct a value from its numeric index
pub trait FromIndex: Sized {
    fn from_index(idx: usize) -> Result<Self>;
}

/// Convert a value to its numeric index
pub trait ToIndex {
    fn to_index(&self) -> Result<usize>;
}
