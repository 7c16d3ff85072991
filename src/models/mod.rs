pub mod todo;
pub mod user;

pub use todo::{CreateTodoRequest, Todo, TodoChanges, UpdateTodoRequest};
pub use user::{User, UserResponse};
