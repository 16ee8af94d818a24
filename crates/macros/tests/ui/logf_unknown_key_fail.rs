use logf::logf;

#[logf(colour = true)]
fn paint(x: u8) -> u8 {
    x
}

fn main() {}
