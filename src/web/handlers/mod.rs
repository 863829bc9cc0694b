pub mod health;
pub mod starmaps;
