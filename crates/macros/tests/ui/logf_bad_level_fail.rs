use logf::logf;

#[logf(level = 25)]
fn noisy(x: u8) -> u8 {
    x
}

fn main() {}
