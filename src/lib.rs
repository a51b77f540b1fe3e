// Gazette: news collection, topic modeling, and time-series statistics.
//
// This is the library root. Each module corresponds to a phase of one of
// the two pipelines: sources → pipeline → store for news collection,
// text → topics → similarity for the analysis passes over stored
// articles, and series for the statistical sequence over a CSV time
// series.

pub mod config;
pub mod output;
pub mod pipeline;
pub mod series;
pub mod similarity;
pub mod sources;
pub mod store;
pub mod text;
pub mod topics;
