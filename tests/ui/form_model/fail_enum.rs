#![allow(dead_code)]

use contactform::form::FormModel;

#[derive(FormModel)]
enum Channel {
    Email,
    Phone,
}

fn main() {}
