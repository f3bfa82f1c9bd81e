mod slingshot;

pub use self::slingshot::*;

pub fn create_game() -> Slingshot {
    Slingshot::new()
}
