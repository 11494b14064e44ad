use super::{
    render_error, ActiveEventLoop, App, ApplicationHandler, Arc, CgvizError, ElementState,
    FutureExt, KeyCode, LogicalSize, MouseButton, RenderEngine, RenderError, Window, WindowEvent,
    WindowId,
};

impl ApplicationHandler for App<'_> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attributes = Window::default_attributes()
            .with_title(self.options.title.clone())
            .with_inner_size(LogicalSize::new(self.options.width, self.options.height));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                self.fail(CgvizError::Render(format!("failed to create window: {e}")));
                event_loop.exit();
                return;
            }
        };

        let mut engine = match RenderEngine::new_windowed(window.clone()).block_on() {
            Ok(engine) => engine,
            Err(e) => {
                self.fail(render_error("failed to create render engine", &e));
                event_loop.exit();
                return;
            }
        };

        engine.background_color = self.options.background_color;
        engine.set_scene(self.geometries);
        log::info!("showing {} geometries", engine.scene_len());

        window.request_redraw();
        self.window = Some(window);
        self.engine = Some(engine);
    }

    #[allow(clippy::cast_possible_truncation)]
    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                self.close_requested = true;
            }
            WindowEvent::Resized(size) => {
                if let Some(engine) = &mut self.engine {
                    engine.resize(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => {
                match self.engine.as_mut().map(RenderEngine::render_to_surface) {
                    None | Some(Ok(()) | Err(RenderError::SurfaceLost)) => {}
                    Some(Err(RenderError::Timeout)) => log::warn!("surface timeout, skipping frame"),
                    Some(Err(e)) => self.fail(render_error("failed to render frame", &e)),
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            WindowEvent::MouseInput { state, button, .. } => match (button, state) {
                (MouseButton::Left, ElementState::Pressed) => self.left_mouse_down = true,
                (MouseButton::Left, ElementState::Released) => self.left_mouse_down = false,
                (MouseButton::Right, ElementState::Pressed) => self.right_mouse_down = true,
                (MouseButton::Right, ElementState::Released) => self.right_mouse_down = false,
                _ => {}
            },
            WindowEvent::ModifiersChanged(modifiers) => {
                self.shift_down = modifiers.state().shift_key();
            }
            WindowEvent::CursorMoved { position, .. } => {
                let delta_x = position.x - self.mouse_pos.0;
                let delta_y = position.y - self.mouse_pos.1;
                self.mouse_pos = (position.x, position.y);

                // Camera control:
                // - Left drag: orbit
                // - Left drag + Shift OR Right drag: pan
                if let Some(engine) = &mut self.engine {
                    let is_pan = self.right_mouse_down || (self.left_mouse_down && self.shift_down);
                    if is_pan {
                        let scale = engine.camera.distance() * 0.002;
                        engine
                            .camera
                            .pan(-delta_x as f32 * scale, delta_y as f32 * scale);
                    } else if self.left_mouse_down {
                        engine
                            .camera
                            .orbit(delta_x as f32 * 0.01, delta_y as f32 * 0.01);
                    }
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                if let Some(engine) = &mut self.engine {
                    let scroll = match delta {
                        winit::event::MouseScrollDelta::LineDelta(_, y) => y,
                        winit::event::MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.1,
                    };
                    let scale = engine.camera.distance() * 0.1;
                    engine.camera.zoom(scroll * scale);
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed
                    && event.physical_key == winit::keyboard::PhysicalKey::Code(KeyCode::Escape)
                {
                    self.close_requested = true;
                }
            }
            _ => {}
        }

        if self.close_requested {
            event_loop.exit();
        }
    }
}
