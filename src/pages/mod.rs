mod layout;
mod login;
mod stats;
mod todo;

pub use layout::MainLayout;
pub use login::LoginPage;
pub use stats::StatsView;
pub use todo::TodoView;
