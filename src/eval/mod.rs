pub mod dispatcher;
pub mod parser;
pub mod readline;
pub mod symbols;
mod validator;

pub use dispatcher::Dispatcher;
pub use readline::LineEditor;
