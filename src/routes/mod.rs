pub(crate) mod health;
pub(crate) mod predictions;
