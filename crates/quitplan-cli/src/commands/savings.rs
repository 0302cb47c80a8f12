use super::{print_json, Context};

pub fn run(user: &str) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = Context::open()?;
    print_json(&ctx.service().savings(user)?)
}
