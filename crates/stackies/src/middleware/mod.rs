mod body_dump;

pub use body_dump::body_dump;
