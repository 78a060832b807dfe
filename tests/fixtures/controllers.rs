// Sample service used by the integration tests. Nothing here is compiled;
// the documentation generator only reads the attributes.

use serde::{Deserialize, Serialize};

#[api_group(group = "basic", content_type = "text/plain", roles("user", "admin"))]
pub struct GoodController;

impl GoodController {
    #[endpoint(
        method = GET,
        url = "/",
        description = "Greet the viewer",
        header(name = "Authorization", value = "Bearer token"),
        status(code = 200, description = "OK"),
        status(code = 500, description = "Internal error")
    )]
    pub fn greet() {
        println!("Sawubona!");
    }
}

#[api_group(group = "auth", content_type = "application/json", accept = "application/json",
            roles("admin", "user"))]
pub struct GoodController2;

impl GoodController2 {
    #[endpoint(
        method = "POST",
        url = "auth/login",
        description = "an endpoint to login your stuff",
        header(name = "Authorization", value = "Bearer token"),
        request_field(name = "username", ty = "string"),
        request_field(name = "password", ty = "string"),
        response_field(name = "status", ty = "boolean"),
        status(code = 200, description = "OK"),
        status(code = 500, description = "Internal error"),
        status(code = 401, description = "unauthorised")
    )]
    pub fn login() {}

    fn audit() {}
}

#[api_group(group = "items", base_url = "items/", accept = "application/json",
            content_type = "application/json", roles("admin"))]
pub struct GoodController3;

impl GoodController3 {
    #[endpoint(
        method = "POST",
        url = "/",
        description = "Add items",
        content_type = "text/plain",
        header(name = "Authorization", value = "Bearer token"),
        request_type = Item,
        status(code = 200, description = "ok"),
        status(code = 400, description = "bad request"),
        status(code = 501, description = "Internal Server error")
    )]
    pub fn add_item() {}

    #[endpoint(
        method = "POST",
        url = "/box-items",
        description = "Add Box items",
        content_type = "text/plain",
        header(name = "Authorization", value = "Bearer token"),
        request_type = BoxOfItems,
        response_type = Vec<Item>,
        status(code = 200, description = "ok")
    )]
    pub fn add_box_items() {}
}

#[derive(Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub price: f64,
    #[serde(rename = "inStock")]
    pub in_stock: bool,
    pub category: Category,
    #[serde(skip)]
    pub cache_key: String,
}

#[derive(Serialize, Deserialize)]
pub enum Category {
    Food,
    Tools,
}

#[derive(Serialize, Deserialize)]
pub struct BoxOfItems {
    pub label: String,
    pub items: Vec<Item>,
    pub extras: Vec<serde_json::Value>,
    pub parent: Option<Box<BoxOfItems>>,
}
