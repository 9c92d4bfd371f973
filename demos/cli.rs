extern crate argon2rs;

use argon2rs::{Context, Params, Variant};
use std::env;
use std::string::String;

fn that_cli_tool(msg: &[u8], salt: &[u8], passes: u32, lanes: u32, logkib: u32) -> [u8; 32] {
    assert!(passes > 0 && logkib > 0 && lanes > 0);
    let params = Params::new_latest(Variant::Argon2i, passes, 1 << logkib, lanes, 32).unwrap();

    let mut out = [0u8; 32];
    let mut pwd = msg.to_vec();
    Context::new(params)
        .hash(&mut out, &mut pwd, salt, &mut [], &[])
        .unwrap();
    out
}

fn to_string(bs: &[u8]) -> String {
    let mut rv = String::new();
    for b in bs.iter() {
        rv.push_str(&format!("{:02x}", b));
    }
    rv
}

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() != 6 {
        println!("usage: {} passes lanes logkib msg salt", args[0]);
        return;
    }

    let t: u32 = args[1].parse().unwrap();
    let l: u32 = args[2].parse().unwrap();
    let logm: u32 = args[3].parse().unwrap();
    let msg = args[4].as_ref();
    let salt = args[5].as_ref();

    println!("Hash: {}", to_string(&that_cli_tool(msg, salt, t, l, logm)));
}
