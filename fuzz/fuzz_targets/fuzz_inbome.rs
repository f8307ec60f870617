use bolero::check;

use inbome::headerdef::HeaderDef;
use inbome::inbome::validate;
use inbome::message::IncomingMessage;
use inbome::openpgp_header::get_openpgp_key_data;

fn main() {
    check!().for_each(|data: &[u8]| {
        if let Ok(msg) = IncomingMessage::from_bytes(data, 0) {
            validate(&msg.get_header_values(HeaderDef::Inbome)).into_header();
            get_openpgp_key_data(&msg.get_header_values(HeaderDef::OpenPgp)).ok();
        }
    });
}
