#![deny(warnings)]

use logf::logf;

#[logf]
fn double(x: u32) -> u32 {
    x * 2
}

#[logf(max_str_len = 5)]
fn my_function(a: &str) -> String {
    format!("{a}bcdefgh")
}

#[logf(single_msg)]
fn checked(raw: &str) -> Result<u8, std::num::ParseIntError> {
    raw.parse()
}

#[logf]
fn unit(flag: bool) {
    let _ = flag;
}

struct Meter {
    total: u64,
}

impl Meter {
    #[logf(skip(self))]
    fn read(&self) -> u64 {
        self.total
    }
}

#[logf]
async fn later(x: u8) -> u8 {
    x
}

fn main() {
    assert_eq!(double(2), 4);
    assert_eq!(my_function("a"), "abcdefgh");
    assert_eq!(checked("7"), Ok(7));
    unit(true);
    assert_eq!(Meter { total: 3 }.read(), 3);
    let _pending = later(1);
}
