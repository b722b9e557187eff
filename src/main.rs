use wavetank::window::App;
use wavetank::RunError;
use winit::event_loop::{ControlFlow, EventLoop};

fn main() -> Result<(), RunError> {
    env_logger::init();

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new();
    event_loop.run_app(&mut app)?;
    Ok(())
}
