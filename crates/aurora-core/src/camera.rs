//! Named camera views and animated transitions between them.
//!
//! These types avoid platform APIs; the web frontend turns a [`CameraPose`]
//! into view/projection matrices and the picking ray.

use crate::constants::{CAMERA_ZFAR, CAMERA_ZNEAR, EARTH_RADIUS, TRANSITION_DURATION_SEC};
use crate::error::UnknownView;
use glam::{Mat4, Vec3};
use std::fmt;
use std::str::FromStr;

/// Called once when a transition lands on its view.
pub type ArrivalCallback = Box<dyn FnOnce(ViewName)>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ViewName {
    Space,
    NorthPole,
    SouthPole,
}

impl ViewName {
    pub const ALL: [ViewName; 3] = [ViewName::Space, ViewName::NorthPole, ViewName::SouthPole];

    pub fn as_str(self) -> &'static str {
        match self {
            ViewName::Space => "space",
            ViewName::NorthPole => "northPole",
            ViewName::SouthPole => "southPole",
        }
    }

    /// Fixed camera configuration of this view.
    pub fn pose(self) -> CameraPose {
        match self {
            ViewName::Space => CameraPose {
                eye: Vec3::new(-20.0, 24.0, 56.0),
                target: Vec3::new(-18.0, 0.0, 0.0),
                up: Vec3::Y,
                fovy_degrees: 50.0,
            },
            // Standing on the ice, looking up into the oval.
            ViewName::NorthPole => CameraPose {
                eye: Vec3::new(0.0, EARTH_RADIUS * 1.02, 0.0),
                target: Vec3::new(0.4, 3.0, -4.0),
                up: Vec3::Y,
                fovy_degrees: 75.0,
            },
            ViewName::SouthPole => CameraPose {
                eye: Vec3::new(0.0, -EARTH_RADIUS * 1.02, 0.0),
                target: Vec3::new(0.4, -3.0, -4.0),
                up: Vec3::Y,
                fovy_degrees: 75.0,
            },
        }
    }
}

impl fmt::Display for ViewName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewName {
    type Err = UnknownView;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "space" | "Space" => Ok(ViewName::Space),
            "northPole" | "north" | "NorthPole" => Ok(ViewName::NorthPole),
            "southPole" | "south" | "SouthPole" => Ok(ViewName::SouthPole),
            other => Err(UnknownView(other.to_string())),
        }
    }
}

/// Right-handed look-at camera with perspective projection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fovy_degrees: f32,
}

impl CameraPose {
    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(
            self.fovy_degrees.to_radians(),
            aspect.max(1e-3),
            CAMERA_ZNEAR,
            CAMERA_ZFAR,
        )
    }

    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn lerp(&self, other: &CameraPose, t: f32) -> CameraPose {
        let up = self.up.lerp(other.up, t).try_normalize().unwrap_or(Vec3::Y);
        CameraPose {
            eye: self.eye.lerp(other.eye, t),
            target: self.target.lerp(other.target, t),
            up,
            fovy_degrees: self.fovy_degrees + (other.fovy_degrees - self.fovy_degrees) * t,
        }
    }
}

struct Transition {
    to: ViewName,
    from: CameraPose,
    elapsed: f32,
    on_arrive: Option<ArrivalCallback>,
}

/// Camera state machine over [`ViewName`]s. At most one transition runs at a time.
pub struct ViewController {
    pose: CameraPose,
    settled: Option<ViewName>,
    transition: Option<Transition>,
    duration: f32,
}

impl ViewController {
    pub fn new(initial: ViewName) -> Self {
        Self {
            pose: initial.pose(),
            settled: Some(initial),
            transition: None,
            duration: TRANSITION_DURATION_SEC,
        }
    }

    pub fn with_duration(mut self, seconds: f32) -> Self {
        if seconds.is_finite() {
            self.duration = seconds.max(1e-3);
        }
        self
    }

    /// Start moving from the current pose to `view`.
    ///
    /// Replaces any transition in flight; the replaced transition's callback
    /// is dropped without being called.
    pub fn transition_to(&mut self, view: ViewName, on_arrive: Option<ArrivalCallback>) {
        if let Some(old) = &self.transition {
            log::info!("[camera] {} superseded by {}", old.to, view);
        } else {
            log::info!("[camera] transition to {}", view);
        }
        self.settled = None;
        self.transition = Some(Transition {
            to: view,
            from: self.pose,
            elapsed: 0.0,
            on_arrive,
        });
    }

    /// Jump to `view` immediately, cancelling any transition.
    pub fn snap_to(&mut self, view: ViewName) {
        self.transition = None;
        self.pose = view.pose();
        self.settled = Some(view);
    }

    pub fn tick(&mut self, dt: f32) {
        let Some(tr) = self.transition.as_mut() else {
            return;
        };
        if dt.is_finite() {
            tr.elapsed += dt.max(0.0);
        }
        let dest = tr.to.pose();
        // arrival only once elapsed has actually reached the full duration
        if tr.elapsed < self.duration {
            let t = (tr.elapsed / self.duration).clamp(0.0, 1.0);
            self.pose = tr.from.lerp(&dest, smoothstep(t));
            return;
        }
        let Some(done) = self.transition.take() else {
            return;
        };
        self.pose = dest;
        self.settled = Some(done.to);
        log::info!("[camera] arrived at {}", done.to);
        if let Some(callback) = done.on_arrive {
            callback(done.to);
        }
    }

    pub fn pose(&self) -> CameraPose {
        self.pose
    }

    /// The view the camera rests at, or `None` mid-transition.
    pub fn current_view(&self) -> Option<ViewName> {
        self.settled
    }

    /// Where the camera is heading, or resting.
    pub fn target_view(&self) -> Option<ViewName> {
        self.transition.as_ref().map(|t| t.to).or(self.settled)
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    /// Linear progress of the transition in flight, 0..=1.
    pub fn progress(&self) -> Option<f32> {
        self.transition
            .as_ref()
            .map(|t| (t.elapsed / self.duration).clamp(0.0, 1.0))
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }
}

#[inline]
fn smoothstep(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}
