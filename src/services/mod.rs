pub mod collection;
pub use collection::{Clock, DramaCollection, DramaError, SystemClock};

pub mod validation;
pub use validation::{FieldError, ValidationErrors, YearRange, check_submission, validate_form};

pub mod view;
pub use view::{
    DerivedView, EmptyState, FilterCriteria, FilterOptions, RawCriteria, SummaryStats,
    derive_view, filter_options,
};

pub mod tracker;
pub use tracker::Tracker;
