use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::color::Rgb;
use super::state::{Lighting, Projected, SceneState};
use crate::graph::NodeGroup;

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

pub fn render(state: &SceneState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(&state.style.background);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	draw_links(state, ctx);
	draw_nodes(state, ctx);
}

fn draw_links(state: &SceneState, ctx: &CanvasRenderingContext2d) {
	let style = &state.style;
	let color = Rgb::parse(&style.link_color).unwrap_or(Rgb::WHITE);
	let t = ease_out_cubic(state.hover.highlight_t);

	for &(src, tgt) in &state.edges {
		let (Some(a), Some(b)) = (state.projected.get(&src), state.projected.get(&tgt)) else {
			continue;
		};
		let scale = state.view.scale_at((a.depth + b.depth) / 2.0);

		// Links between highlighted nodes brighten, the rest fade back
		let alpha = if state.is_highlighted(src) && state.is_highlighted(tgt) {
			style.link_opacity + (1.0 - style.link_opacity) * 0.6 * t
		} else {
			style.link_opacity * (1.0 - 0.7 * t)
		};

		ctx.set_stroke_style_str(&color.css(alpha));
		ctx.set_line_width((style.link_width * scale).max(0.5));
		ctx.begin_path();
		ctx.move_to(a.x, a.y);
		ctx.line_to(b.x, b.y);
		ctx.stroke();

		draw_particles(state, ctx, a, b, color, alpha);
	}
}

/// Dots travelling from source to target.
fn draw_particles(
	state: &SceneState,
	ctx: &CanvasRenderingContext2d,
	a: &Projected,
	b: &Projected,
	color: Rgb,
	alpha: f64,
) {
	let style = &state.style;
	if style.particles == 0 {
		return;
	}
	let count = style.particles as f64;
	ctx.set_fill_style_str(&color.css((alpha * 2.0).min(1.0)));
	for i in 0..style.particles {
		let f = (state.flow_time * style.particle_speed + i as f64 / count).fract();
		let depth = a.depth + (b.depth - a.depth) * f;
		let radius = (style.particle_width / 2.0 * state.view.scale_at(depth)).max(0.5);
		ctx.begin_path();
		let _ = ctx.arc(
			a.x + (b.x - a.x) * f,
			a.y + (b.y - a.y) * f,
			radius,
			0.0,
			2.0 * PI,
		);
		ctx.fill();
	}
}

fn draw_nodes(state: &SceneState, ctx: &CanvasRenderingContext2d) {
	let (has_highlight, t) = (
		state.has_active_highlight(),
		ease_out_cubic(state.hover.highlight_t),
	);
	let lighting = state.lighting();
	let label_color = Rgb::parse(&state.style.link_color).unwrap_or(Rgb::WHITE);

	for sprite in &state.draw_order {
		let (p, idx) = (&sprite.at, sprite.idx);
		let highlighted = has_highlight && state.is_highlighted(idx);
		let hovered = has_highlight && state.is_hovered(idx);
		let (alpha, radius) = if !has_highlight {
			(state.style.node_opacity, p.radius)
		} else if hovered {
			(state.style.node_opacity, p.radius * (1.0 + 0.35 * t))
		} else if highlighted {
			(state.style.node_opacity, p.radius * (1.0 + 0.2 * t))
		} else {
			(state.style.node_opacity * (1.0 - 0.7 * t), p.radius * (1.0 - 0.15 * t))
		};
		draw_sphere(ctx, p.x, p.y, radius.max(0.5), sprite.color, alpha, &lighting);

		if sprite.group == NodeGroup::Leaf && !highlighted {
			continue;
		}
		if let Some(label) = state.labels.get(&idx) {
			let label_alpha = if highlighted { 1.0 } else { alpha * 0.8 };
			ctx.set_fill_style_str(&label_color.css(label_alpha));
			ctx.set_font(&format!("{}px sans-serif", (radius * 2.5).clamp(9.0, 14.0)));
			let _ = ctx.fill_text(label, p.x + radius + 3.0, p.y + 3.0);
		}
	}
}

/// Shade a disc as a lit sphere: brightest where the key light hits,
/// falling back to the ambient level at the rim.
fn draw_sphere(
	ctx: &CanvasRenderingContext2d,
	x: f64,
	y: f64,
	radius: f64,
	color: Rgb,
	alpha: f64,
	lighting: &Lighting,
) {
	let (hx, hy) = (
		x + lighting.highlight.0 * radius,
		y + lighting.highlight.1 * radius,
	);
	let lit = color
		.scale(lighting.ambient + lighting.key)
		.mix(Rgb::WHITE, 0.35 * lighting.key);
	let rim = color.scale(lighting.ambient);

	ctx.begin_path();
	let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
	match ctx.create_radial_gradient(hx, hy, radius * 0.1, x, y, radius) {
		Ok(gradient) => {
			let _ = gradient.add_color_stop(0.0, &lit.css(alpha));
			let _ = gradient.add_color_stop(1.0, &rim.css(alpha));
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
		}
		Err(_) => ctx.set_fill_style_str(&color.css(alpha)),
	}
	ctx.fill();
}
