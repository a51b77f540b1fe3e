// Document similarity: count vectorization, cosine distance, and a 2-D
// projection of the whole article store.

pub mod matrix;
pub mod mds;
pub mod plot;
