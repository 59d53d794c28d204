/// 8-bit RGB colour, parsed from CSS hex and written back as `rgba()`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rgb {
	pub r: u8,
	pub g: u8,
	pub b: u8,
}

impl Rgb {
	pub const WHITE: Self = Self::from_u32(0xffffff);

	pub const fn from_u32(hex: u32) -> Self {
		Self {
			r: ((hex >> 16) & 0xff) as u8,
			g: ((hex >> 8) & 0xff) as u8,
			b: (hex & 0xff) as u8,
		}
	}

	/// Parse `#rgb` or `#rrggbb`. Anything else yields `None`.
	pub fn parse(css: &str) -> Option<Self> {
		let hex = css.strip_prefix('#')?;
		match hex.len() {
			6 => u32::from_str_radix(hex, 16).ok().map(Self::from_u32),
			3 => {
				let v = u32::from_str_radix(hex, 16).ok()?;
				let expand = |n: u32| (n << 4 | n) as u8;
				Some(Self {
					r: expand((v >> 8) & 0xf),
					g: expand((v >> 4) & 0xf),
					b: expand(v & 0xf),
				})
			}
			_ => None,
		}
	}

	/// Mean channel level in `0..=1`, used as a light intensity.
	pub fn luminance(self) -> f64 {
		(self.r as f64 + self.g as f64 + self.b as f64) / (3.0 * 255.0)
	}

	/// Multiply every channel by `factor`, saturating.
	pub fn scale(self, factor: f64) -> Self {
		let ch = |c: u8| (c as f64 * factor).round().clamp(0.0, 255.0) as u8;
		Self {
			r: ch(self.r),
			g: ch(self.g),
			b: ch(self.b),
		}
	}

	/// Move `t` of the way towards `other`.
	pub fn mix(self, other: Self, t: f64) -> Self {
		let ch = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round().clamp(0.0, 255.0) as u8;
		Self {
			r: ch(self.r, other.r),
			g: ch(self.g, other.g),
			b: ch(self.b, other.b),
		}
	}

	pub fn css(self, alpha: f64) -> String {
		format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, alpha.clamp(0.0, 1.0))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_short_and_long_hex() {
		assert_eq!(Rgb::parse("#ff6b6b"), Some(Rgb { r: 255, g: 107, b: 107 }));
		assert_eq!(Rgb::parse("#4f4"), Some(Rgb { r: 0x44, g: 0xff, b: 0x44 }));
		assert_eq!(Rgb::parse("red"), None);
	}

	#[test]
	fn scale_saturates() {
		let c = Rgb::from_u32(0x808080).scale(4.0);
		assert_eq!(c, Rgb::WHITE);
		assert_eq!(Rgb::from_u32(0xbbbbbb).luminance(), 0xbb as f64 / 255.0);
		assert_eq!(Rgb::WHITE.css(0.5), "rgba(255, 255, 255, 0.5)");
	}
}
