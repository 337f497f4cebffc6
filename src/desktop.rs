use crate::config::{AdvectionMode, BoundaryMode, SimulationParams};
use crate::error::Result;
use crate::input::{InputEvent, PointerHub};
use crate::orchestrator::Orchestrator;
use crate::render::Renderer;
use eframe::egui;
use glam::Vec2;
use std::time::Duration;

const PARAMS_KEY: &str = "simulation_params";

pub struct LiquidEtherApp {
    hub: PointerHub,
    simulation: Orchestrator,
    renderer: Renderer,
    texture: Option<egui::TextureHandle>,
    pointer_inside: bool,
    show_controls: bool,
    draft: SimulationParams,
    status: Option<String>,
}

impl LiquidEtherApp {
    pub fn new(params: SimulationParams, width: u32, height: u32) -> Result<Self> {
        let hub = PointerHub::new();
        let simulation = Orchestrator::new(params.clone(), width, height, &hub)?;
        Ok(Self {
            hub,
            simulation,
            renderer: Renderer::default().with_background([0.0, 0.0, 0.0, 1.0]),
            texture: None,
            pointer_inside: false,
            show_controls: false,
            draft: params,
            status: None,
        })
    }

    /// Restores the parameters saved by a previous session, falling back to
    /// `params`.
    pub fn from_creation_context(
        cc: &eframe::CreationContext<'_>,
        params: SimulationParams,
        width: u32,
        height: u32,
    ) -> Result<Self> {
        let restored = cc
            .storage
            .and_then(|storage| eframe::get_value::<SimulationParams>(storage, PARAMS_KEY))
            .filter(|p| p.validate().is_ok());
        if restored.is_some() {
            log::info!("restored simulation parameters from previous session");
        }
        Self::new(restored.unwrap_or(params), width, height)
    }

    fn publish_pointer(&mut self, ctx: &egui::Context, rect: egui::Rect) {
        let to_ndc = |pos: egui::Pos2| {
            Vec2::new(
                (pos.x - rect.left()) / rect.width() * 2.0 - 1.0,
                -((pos.y - rect.top()) / rect.height() * 2.0 - 1.0),
            )
        };

        let (hover, moving, touches) = ctx.input(|i| {
            let touches: Vec<(egui::TouchPhase, egui::Pos2)> = i
                .events
                .iter()
                .filter_map(|e| match e {
                    egui::Event::Touch { phase, pos, .. } => Some((*phase, *pos)),
                    _ => None,
                })
                .collect();
            (i.pointer.hover_pos(), i.pointer.is_moving(), touches)
        });

        if !touches.is_empty() {
            for (phase, pos) in touches {
                let event = match phase {
                    egui::TouchPhase::Start if rect.contains(pos) => {
                        InputEvent::TouchStart(to_ndc(pos))
                    }
                    egui::TouchPhase::Move if rect.contains(pos) => {
                        InputEvent::TouchMove(to_ndc(pos))
                    }
                    egui::TouchPhase::End | egui::TouchPhase::Cancel => InputEvent::TouchEnd,
                    _ => continue,
                };
                self.hub.publish(event);
            }
            return;
        }

        match hover.filter(|pos| rect.contains(*pos)) {
            Some(pos) => {
                if moving || !self.pointer_inside {
                    self.hub.publish(InputEvent::PointerMove(to_ndc(pos)));
                }
                self.pointer_inside = true;
            }
            None if self.pointer_inside => {
                self.hub.publish(InputEvent::PointerLeave);
                self.pointer_inside = false;
            }
            None => {}
        }
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        ui.heading("Parameters");
        let p = &mut self.draft;

        ui.add(egui::Slider::new(&mut p.resolution_scale, 0.1..=1.0).text("Resolution"));
        ui.add(egui::Slider::new(&mut p.timestep, 0.001..=0.05).text("Timestep"));
        ui.add(egui::Slider::new(&mut p.force_multiplier, 0.0..=100.0).text("Force"));
        ui.add(egui::Slider::new(&mut p.influence_radius, 1.0..=200.0).text("Radius"));
        ui.add(egui::Slider::new(&mut p.pressure_iterations, 1..=128).text("Pressure iters"));

        ui.checkbox(&mut p.viscosity_enabled, "Viscosity");
        ui.add_enabled(
            p.viscosity_enabled,
            egui::Slider::new(&mut p.viscosity_coefficient, 0.0..=100.0).text("Viscosity"),
        );
        ui.add_enabled(
            p.viscosity_enabled,
            egui::Slider::new(&mut p.viscosity_iterations, 1..=128).text("Viscous iters"),
        );

        ui.horizontal(|ui| {
            ui.label("Advection:");
            ui.radio_value(&mut p.advection_mode, AdvectionMode::Simple, "Simple");
            ui.radio_value(&mut p.advection_mode, AdvectionMode::Bfecc, "BFECC");
        });
        ui.horizontal(|ui| {
            ui.label("Boundary:");
            ui.radio_value(&mut p.boundary_mode, BoundaryMode::Wrap, "Wrap");
            ui.radio_value(&mut p.boundary_mode, BoundaryMode::Bounded, "Bounded");
        });

        ui.separator();
        ui.checkbox(&mut p.autopilot.enabled, "Autopilot");
        ui.add(egui::Slider::new(&mut p.autopilot.idle_delay, 0.0..=10.0).text("Idle delay"));
        ui.add(egui::Slider::new(&mut p.autopilot.speed, 0.05..=2.0).text("Auto speed"));
        ui.add(egui::Slider::new(&mut p.autopilot.intensity, 0.0..=5.0).text("Auto intensity"));

        if ui.button("Apply").clicked() {
            self.status = match self.simulation.apply_params(self.draft.clone()) {
                Ok(()) => None,
                Err(e) => Some(e.to_string()),
            };
        }
        if let Some(status) = &self.status {
            ui.colored_label(egui::Color32::LIGHT_RED, status);
        }

        ui.separator();
        let (w, h) = self.simulation.grid_size();
        ui.label(format!(
            "Frame {} | grid {w}x{h} | {:?}",
            self.simulation.frame_count(),
            self.simulation.pointer_mode()
        ));
    }
}

impl eframe::App for LiquidEtherApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let minimized = ctx.input(|i| i.viewport().minimized.unwrap_or(false));
        if minimized {
            self.simulation.pause();
        } else {
            self.simulation.resume();
        }

        if ctx.input(|i| i.key_pressed(egui::Key::Tab)) {
            self.show_controls = !self.show_controls;
        }

        if self.show_controls {
            egui::SidePanel::left("controls").show(ctx, |ui| self.controls(ui));
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                let (rect, _response) =
                    ui.allocate_exact_size(ui.available_size(), egui::Sense::hover());

                let ppp = ctx.pixels_per_point();
                let display = (
                    (rect.width() * ppp).round() as u32,
                    (rect.height() * ppp).round() as u32,
                );
                if display != self.simulation.display_size() {
                    if let Err(e) = self.simulation.request_resize(display.0, display.1) {
                        log::warn!("ignoring resize: {e}");
                    }
                }

                self.publish_pointer(ctx, rect);

                let dt = ctx.input(|i| i.unstable_dt);
                self.simulation.tick(frame_duration(dt));

                let image = self.renderer.render(self.simulation.velocity());
                let color_image = egui::ColorImage::from_rgba_unmultiplied(
                    [image.width() as usize, image.height() as usize],
                    image.as_raw(),
                );
                if let Some(texture) = self.texture.as_mut() {
                    texture.set(color_image, egui::TextureOptions::LINEAR);
                } else {
                    self.texture = Some(ctx.load_texture(
                        "velocity",
                        color_image,
                        egui::TextureOptions::LINEAR,
                    ));
                }

                if let Some(texture) = &self.texture {
                    ui.painter().image(
                        texture.id(),
                        rect,
                        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                        egui::Color32::WHITE,
                    );
                }
            });

        // no repaint request while paused, so no frame is left pending
        if !self.simulation.is_paused() {
            ctx.request_repaint();
        }
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, PARAMS_KEY, self.simulation.params());
    }
}

/// Host frame time clamped to at most 100 ms. Non-finite input counts as zero.
fn frame_duration(dt: f32) -> Duration {
    Duration::try_from_secs_f32(dt.clamp(0.0, 0.1)).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_duration_is_clamped() {
        assert_eq!(frame_duration(0.016), Duration::from_secs_f32(0.016));
        assert_eq!(frame_duration(3.0), Duration::from_secs_f32(0.1));
        assert_eq!(frame_duration(-1.0), Duration::ZERO);
        assert_eq!(frame_duration(f32::NAN), Duration::ZERO);
        assert_eq!(frame_duration(f32::INFINITY), Duration::from_secs_f32(0.1));
    }
}
