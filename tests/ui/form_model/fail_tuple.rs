#![allow(dead_code)]

use contactform::form::FormModel;

#[derive(FormModel)]
struct Callback(String, String);

fn main() {}
