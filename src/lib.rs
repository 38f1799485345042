// Hotel reservation & pricing rules engine

pub mod api;
pub mod availability;
pub mod billing;
pub mod clock;
pub mod error;
pub mod lifecycle;
pub mod model;
pub mod promotion;
pub mod store;

// Re-export key types for convenience
pub use api::{
    AvailabilitySearchRequest, AvailabilitySearchResponse, CancelBookingRequest,
    CancelBookingResponse, CreateBookingRequest, Engine, EngineConfig, GenerateBillRequest,
    GenerateBillResponse,
};
pub use availability::{AvailabilityCalculator, RoomFilters};
pub use billing::{compute_totals, BillTotals, BillingWarning};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{AvailabilityError, EngineError, LifecycleError};
pub use lifecycle::BookingLifecycle;
pub use model::{
    Booking, BookingStatus, OrderLine, Promotion, PromotionKind, Room, RoomType, TimeWindow,
};
pub use promotion::PromotionEvaluator;
pub use store::EngineStore;
