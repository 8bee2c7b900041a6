//! fieldscan — scan-line vision pipeline for humanoid soccer robots.
//!
//! Classifies a raw YCbCr camera frame against a colour lookup table and
//! extracts typed field objects without ever touching every pixel. The
//! pipeline stages are:
//!
//! 1. **Border** – per-column green search below the kinematic horizon,
//!    upper convex hull, per-column interpolation.
//! 2. **Scan grid** – staggered vertical lines below the border plus
//!    horizontal lines through and above the border band.
//! 3. **Segments** – run-length debounced colour transitions along each
//!    scan line.
//! 4. **Candidates** – greedy union of adjacent same-colour segments into
//!    bounding boxes.
//! 5. **Fitters** – least-squares circle fit for the ball, overlap-merge and
//!    midline ranging for goal posts.
//! 6. **Field objects** – distance/bearing/elevation estimates written into
//!    the single frame-local channel read by behaviour.
//!
//! # Public API
//! [`Vision`] and [`VisionConfig`] are the primary entry points. The stage
//! functions are exported individually for targeted use and testing.

pub mod ball;
pub mod border;
pub mod candidates;
pub mod classify;
pub mod geometry;
pub mod goal;
pub mod horizon;
pub mod image;
pub mod objects;
pub mod scangrid;
pub mod scanline;
pub mod segment;
pub mod vision;

#[cfg(test)]
pub(crate) mod test_utils;

pub use ball::{find_ball, BallParams};
pub use border::{convex_upper_hull, find_green_border_points, interpolate_borders};
pub use candidates::{classify_candidates, ClusterParams, ObjectCandidate};
pub use classify::{ColorClass, LookupTable};
pub use geometry::{fit_circle, Circle, Point2i};
pub use goal::{cluster_horizontal_candidates, find_goal_posts, GoalMeasurement, GoalParams};
pub use horizon::Horizon;
pub use image::{Pixel, YcbcrImage};
pub use objects::{FieldObjects, GoalPostId, MobileObject, Polar, StationaryObject};
pub use scangrid::{horizontal_scan, vertical_scan};
pub use scanline::{ClassifiedSection, ScanDirection, ScanLine, TransitionSegment};
pub use segment::{classify_scan_area, closely_classify_scanline};
pub use vision::{FrameSummary, Vision, VisionConfig};
