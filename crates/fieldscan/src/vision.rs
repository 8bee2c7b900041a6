//! Frame pipeline: border → grid → segments → candidates → fitters → objects.
//!
//! [`Vision`] wires the stage functions together and converts fitted image
//! geometry into camera-relative polar measurements via a pinhole model.
//! It owns nothing frame-local; everything between border finding and the
//! object updates is rebuilt per call.

use std::error::Error;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use tracing::debug;

use crate::ball::{find_ball, BallParams};
use crate::border::{convex_upper_hull, find_green_border_points, interpolate_borders};
use crate::candidates::{classify_candidates, ClusterParams};
use crate::classify::{ColorClass, LookupTable};
use crate::geometry::Circle;
use crate::goal::{cluster_horizontal_candidates, find_goal_posts, GoalMeasurement, GoalParams};
use crate::horizon::Horizon;
use crate::image::YcbcrImage;
use crate::objects::{FieldObjects, GoalPostId, Polar};
use crate::scangrid::{horizontal_scan, vertical_scan};
use crate::segment::classify_scan_area;

const BALL_COLOURS: [ColorClass; 3] = [
    ColorClass::RedOrange,
    ColorClass::Orange,
    ColorClass::YellowOrange,
];
const GOAL_COLOURS: [ColorClass; 2] = [ColorClass::Yellow, ColorClass::Blue];

/// Pinhole camera model used for bearings, elevations and ranging.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CameraModel {
    pub focal_length_px: f32,
}

impl Default for CameraModel {
    fn default() -> Self {
        Self {
            focal_length_px: 385.0,
        }
    }
}

impl CameraModel {
    /// Bearing of an image column, positive to the left of the optical axis.
    pub fn bearing_rad(&self, x: f32, image_width: i32) -> f32 {
        ((image_width as f32 / 2.0 - x) / self.focal_length_px).atan()
    }

    /// Elevation of an image row, positive above the optical axis.
    pub fn elevation_rad(&self, y: f32, image_height: i32) -> f32 {
        ((image_height as f32 / 2.0 - y) / self.focal_length_px).atan()
    }
}

/// Full pipeline configuration. Every field has a tuned default; JSON files
/// may override any subset.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct VisionConfig {
    pub scan_spacing: i32,
    pub camera: CameraModel,
    pub cluster: ClusterParams,
    pub ball: BallParams,
    pub goal: GoalParams,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            scan_spacing: 16,
            camera: CameraModel::default(),
            cluster: ClusterParams::default(),
            ball: BallParams::default(),
            goal: GoalParams::default(),
        }
    }
}

impl VisionConfig {
    pub fn from_json_file(path: &Path) -> Result<Self, Box<dyn Error>> {
        let file = File::open(path)?;
        let config = serde_json::from_reader(BufReader::new(file))?;
        Ok(config)
    }

    pub fn to_json_file(&self, path: &Path) -> Result<(), Box<dyn Error>> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }
}

/// Per-frame counters for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameSummary {
    pub border_points: usize,
    pub vertical_segments: usize,
    pub horizontal_segments: usize,
    pub ball_candidates: usize,
    pub goal_candidates: usize,
    pub ball: Circle,
    pub goal_posts: usize,
}

/// The vision pipeline. Construct once, call per frame.
#[derive(Debug, Clone, Default)]
pub struct Vision {
    config: VisionConfig,
}

impl Vision {
    pub fn new(config: VisionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &VisionConfig {
        &self.config
    }

    /// Process one frame, updating `objects` in place.
    pub fn process_frame(
        &self,
        image: &YcbcrImage,
        table: &LookupTable,
        horizon: &Horizon,
        objects: &mut FieldObjects,
    ) -> FrameSummary {
        objects.begin_frame();
        let spacing = self.config.scan_spacing;
        let timestamp_ms = image.timestamp_ms();

        let green = find_green_border_points(image, table, spacing, horizon);
        let hull = convex_upper_hull(&green);
        let border = interpolate_borders(&hull, spacing, image.height());
        debug!(
            points = green.len(),
            hull = hull.len(),
            columns = border.len(),
            "field border"
        );

        let mut vertical = vertical_scan(&border, spacing, image);
        classify_scan_area(&mut vertical, image, table);
        let mut horizontal = horizontal_scan(&border, spacing, image);
        classify_scan_area(&mut horizontal, image, table);
        let v_segments = vertical.all_segments();
        let h_segments = horizontal.all_segments();
        debug!(
            vertical = v_segments.len(),
            horizontal = h_segments.len(),
            "transition segments"
        );

        let ball_candidates = classify_candidates(&v_segments, &BALL_COLOURS, &self.config.cluster);
        let goal_candidates = classify_candidates(&v_segments, &GOAL_COLOURS, &self.config.cluster);
        debug!(
            ball = ball_candidates.len(),
            goal = goal_candidates.len(),
            "candidates clustered"
        );

        let ball = find_ball(&ball_candidates, image, table, &self.config.ball);
        if ball.is_defined && ball.radius > 0.0 {
            let (polar, error) = self.ball_measurement(&ball, image);
            objects.ball.update_visual(polar, error, timestamp_ms);
            debug!(
                distance_cm = polar.distance_cm,
                bearing_rad = polar.bearing_rad,
                "ball seen"
            );
        }

        // The vertical grid stops at the field border, so posts standing
        // partly or wholly above it only show up on the horizontal lines.
        let above_horizon =
            cluster_horizontal_candidates(&h_segments, &GOAL_COLOURS, 2 * spacing);
        // The goal fitter carries its own focal length so it can be used
        // standalone; inside the pipeline the camera model wins.
        let goal_params = GoalParams {
            focal_length_px: self.config.camera.focal_length_px,
            ..self.config.goal
        };
        let posts = find_goal_posts(&goal_candidates, &above_horizon, &h_segments, &goal_params);
        let goal_posts = self.assign_posts(&posts, image, objects, timestamp_ms);

        FrameSummary {
            border_points: border.len(),
            vertical_segments: v_segments.len(),
            horizontal_segments: h_segments.len(),
            ball_candidates: ball_candidates.len(),
            goal_candidates: goal_candidates.len(),
            ball,
            goal_posts,
        }
    }

    fn ball_measurement(&self, ball: &Circle, image: &YcbcrImage) -> (Polar, Polar) {
        let cam = &self.config.camera;
        let distance_cm = cam.focal_length_px * self.config.ball.ball_radius_cm / ball.radius;
        let polar = Polar::new(
            distance_cm,
            cam.bearing_rad(ball.centre_x, image.width()),
            cam.elevation_rad(ball.centre_y, image.height()),
        );
        // One fit-residual's worth of radius maps to this much range; the
        // fallback geometry reports sd = 0, floor it at one pixel.
        let pixel_err = ball.sd.max(1.0);
        let error = Polar::new(
            distance_cm * pixel_err / ball.radius,
            pixel_err / cam.focal_length_px,
            pixel_err / cam.focal_length_px,
        );
        (polar, error)
    }

    /// Write up to two posts per goal colour into the object store, split
    /// left/right by image x. A lone post lands on the left slot; resolving
    /// which physical post it is takes field-state context vision does not
    /// have.
    fn assign_posts(
        &self,
        posts: &[GoalMeasurement],
        image: &YcbcrImage,
        objects: &mut FieldObjects,
        timestamp_ms: f64,
    ) -> usize {
        let cam = self.config.camera;
        let mut assigned = 0;
        for (colour, left_id, right_id) in [
            (ColorClass::Yellow, GoalPostId::YellowLeft, GoalPostId::YellowRight),
            (ColorClass::Blue, GoalPostId::BlueLeft, GoalPostId::BlueRight),
        ] {
            let of_colour: Vec<&GoalMeasurement> = posts
                .iter()
                .filter(|m| m.candidate.color == colour)
                .take(2)
                .collect();
            let measure = |m: &GoalMeasurement| {
                let c = m.candidate;
                let cx = (c.top_left.x + c.bottom_right.x) as f32 / 2.0;
                let cy = (c.top_left.y + c.bottom_right.y) as f32 / 2.0;
                let polar = Polar::new(
                    m.distance_cm,
                    cam.bearing_rad(cx, image.width()),
                    cam.elevation_rad(cy, image.height()),
                );
                // One pixel of width error in range, one pixel in angle.
                let error = Polar::new(
                    m.distance_cm / c.width().max(1) as f32,
                    1.0 / cam.focal_length_px,
                    1.0 / cam.focal_length_px,
                );
                (polar, error)
            };
            match of_colour.as_slice() {
                [] => {}
                [only] => {
                    let (polar, error) = measure(*only);
                    objects.post_mut(left_id).update_visual(polar, error, timestamp_ms);
                    assigned += 1;
                }
                [a, b, ..] => {
                    let (first, second) = if a.candidate.top_left.x <= b.candidate.top_left.x {
                        (*a, *b)
                    } else {
                        (*b, *a)
                    };
                    let (polar, error) = measure(first);
                    objects.post_mut(left_id).update_visual(polar, error, timestamp_ms);
                    let (polar, error) = measure(second);
                    objects.post_mut(right_id).update_visual(polar, error, timestamp_ms);
                    assigned += 2;
                }
            }
        }
        if assigned > 0 {
            debug!(posts = assigned, "goal posts assigned");
        }
        assigned
    }
}
