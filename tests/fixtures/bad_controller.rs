// A handler type whose group attribute was forgotten.

pub struct BadController;

impl BadController {
    #[endpoint(method = "GET", url = "/")]
    pub fn greet() {}
}
