pub mod app;
pub mod event;
pub mod input;
pub mod pane;
pub mod theme;
pub mod widgets;

pub use app::App;
pub use pane::ScrollPane;
pub use theme::GruvboxMaterial;
