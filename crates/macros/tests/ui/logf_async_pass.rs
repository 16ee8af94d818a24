use std::time::Duration;

use logf::logf;

#[logf(level = "DEBUG")]
async fn sleepy(ms: u64) -> u64 {
    tokio::time::sleep(Duration::from_millis(ms)).await;
    ms
}

#[logf(single_msg)]
async fn fallible(fail: bool) -> Result<&'static str, String> {
    if fail {
        return Err("bad".to_string());
    }
    Ok("fine")
}

struct Service {
    name: String,
}

impl Service {
    #[logf(skip(self))]
    async fn greet(&self, who: &str) -> String {
        format!("{} greets {who}", self.name)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    assert_eq!(sleepy(1).await, 1);
    assert_eq!(fallible(false).await, Ok("fine"));
    assert_eq!(fallible(true).await, Err("bad".to_string()));

    let service = Service { name: "svc".into() };
    assert_eq!(service.greet("you").await, "svc greets you");
}
