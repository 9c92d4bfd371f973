// benches argon2rs against the reference c implementation at
// https://github.com/p-h-c/phc-winner-argon2
#![feature(test)]

extern crate argon2rs;
extern crate cargon;
extern crate test;

use argon2rs::{defaults, Context, Params, Variant};
use std::ptr;

const PASSWORD: &'static [u8] = b"cargo bench --feature=bench_ref";
const SALT: &'static [u8] = b"cargo test --release";

#[bench]
fn bench_argon2rs_i(b: &mut test::Bencher) {
    let params = Params::new(
        Variant::Argon2i,
        argon2rs::Version::V0x10,
        defaults::T_COST,
        defaults::M_COST,
        defaults::LANES,
        defaults::OUTLEN as u32,
    )
    .unwrap();
    let ctx = Context::new(params);
    let mut out = [0u8; defaults::OUTLEN];

    b.iter(|| {
        let mut pwd = PASSWORD.to_vec();
        ctx.hash(&mut out, &mut pwd, SALT, &mut [], &[]).unwrap();
    });
}

#[bench]
fn bench_cargon_i(b: &mut test::Bencher) {
    let mut out = [0u8; defaults::OUTLEN];
    let mut ctx = cargon::CargonContext {
        out: out.as_mut_ptr(),
        outlen: out.len() as u32,
        pwd: PASSWORD.as_ptr(),
        pwdlen: PASSWORD.len() as u32,
        salt: SALT.as_ptr(),
        saltlen: SALT.len() as u32,
        secret: ptr::null(),
        secretlen: 0,
        ad: ptr::null(),
        adlen: 0,

        t_cost: defaults::T_COST,
        m_cost: defaults::M_COST,
        lanes: defaults::LANES,
        threads: defaults::LANES,
        version: 0x10,
        allocate_fptr: ptr::null(),
        deallocate_fptr: ptr::null(),
        flags: cargon::ARGON2_FLAG_CLEAR_MEMORY,
    };

    b.iter(|| unsafe { cargon::argon2_ctx(&mut ctx, Variant::Argon2i as usize) });
}
