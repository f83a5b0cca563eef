pub mod aggregate;
pub mod error;
pub mod pipeline;
pub mod view;

pub use aggregate::{AggregatedDataset, XpDistribution, aggregate};
pub use error::{PipelineError, SessionError};
pub use pipeline::{Credentials, DefaultPipeline, Pipeline};
pub use view::ProfileView;
