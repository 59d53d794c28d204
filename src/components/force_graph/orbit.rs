use super::surface::CameraPose;
use crate::config::CameraSettings;

/// Slow automatic camera circle around the origin.
#[derive(Clone, Debug, PartialEq)]
pub struct Orbit {
	angle: f64,
	distance: f64,
	height: f64,
	speed: f64,
	max_dt: f64,
}

impl Orbit {
	/// Starts at the bearing of the initial camera position so the first
	/// frames do not swing the camera around.
	pub fn new(camera: &CameraSettings) -> Self {
		let [x, _, z] = camera.initial_position;
		Self {
			angle: x.atan2(z),
			distance: camera.orbit_distance,
			height: camera.orbit_height,
			speed: camera.orbit_speed,
			max_dt: camera.max_frame_dt,
		}
	}

	/// Current angle in radians.
	pub fn angle(&self) -> f64 {
		self.angle
	}

	/// Step by `dt` seconds. Long gaps (a backgrounded tab) are clamped.
	pub fn advance(&mut self, dt: f64) -> CameraPose {
		self.angle += self.speed * dt.clamp(0.0, self.max_dt);
		self.pose()
	}

	/// Camera pose at the current angle.
	pub fn pose(&self) -> CameraPose {
		CameraPose::looking_at_origin([
			self.distance * self.angle.sin(),
			self.height * (self.angle * 2.0).sin(),
			self.distance * self.angle.cos(),
		])
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn advance_is_frame_rate_independent() {
		let camera = CameraSettings::default();
		let (mut fast, mut slow) = (Orbit::new(&camera), Orbit::new(&camera));
		for _ in 0..120 {
			fast.advance(1.0 / 120.0);
		}
		for _ in 0..30 {
			slow.advance(1.0 / 30.0);
		}
		assert!((fast.angle() - slow.angle()).abs() < 1e-9);
	}

	#[test]
	fn stalled_frames_are_clamped() {
		let camera = CameraSettings::default();
		let mut orbit = Orbit::new(&camera);
		let start = orbit.angle();
		orbit.advance(30.0);
		assert!((orbit.angle() - start - camera.orbit_speed * camera.max_frame_dt).abs() < 1e-12);
	}

	#[test]
	fn pose_keeps_orbit_distance() {
		let mut orbit = Orbit::new(&CameraSettings::default());
		let pose = orbit.advance(0.05);
		let [x, _, z] = pose.position;
		assert!(((x * x + z * z).sqrt() - 150.0).abs() < 1e-9);
		assert_eq!(pose.look_at, [0.0; 3]);
	}
}
