use bolero::check;

use inbome::param::HeaderParams;

fn main() {
    check!().for_each(|data: &[u8]| match std::str::from_utf8(data) {
        Ok(input) => {
            HeaderParams::parse(input).ok();
        }
        Err(_err) => {}
    });
}
