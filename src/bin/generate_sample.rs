//! Writes a deterministic synthetic "galaxy" FITS image for demos and
//! manual testing:
//!
//! ```text
//! cargo run --bin generate_sample [galaxy.fits]
//! ```

use anyhow::{Context, Result};
use fitrs::{Fits, Hdu};

const WIDTH: usize = 512;
const HEIGHT: usize = 512;

/// An elliptical Gaussian source: centre, widths, rotation, peak value.
struct Blob {
    cx: f64,
    cy: f64,
    sigma_x: f64,
    sigma_y: f64,
    angle: f64,
    amplitude: f64,
}

impl Blob {
    fn value_at(&self, x: f64, y: f64) -> f64 {
        let (sin, cos) = self.angle.sin_cos();
        let dx = x - self.cx;
        let dy = y - self.cy;
        let u = dx * cos + dy * sin;
        let v = -dx * sin + dy * cos;
        self.amplitude
            * (-(u * u) / (2.0 * self.sigma_x * self.sigma_x)
                - (v * v) / (2.0 * self.sigma_y * self.sigma_y))
                .exp()
    }
}

fn main() -> Result<()> {
    let out = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "galaxy.fits".to_string());

    let mut rng = SimpleRng::new(42);

    // A spiral-galaxy-ish core plus two companions.
    let blobs = [
        Blob {
            cx: 256.0,
            cy: 256.0,
            sigma_x: 70.0,
            sigma_y: 28.0,
            angle: 0.6,
            amplitude: 180.0,
        },
        Blob {
            cx: 256.0,
            cy: 256.0,
            sigma_x: 14.0,
            sigma_y: 12.0,
            angle: 0.0,
            amplitude: 420.0,
        },
        Blob {
            cx: 110.0,
            cy: 380.0,
            sigma_x: 10.0,
            sigma_y: 9.0,
            angle: 0.0,
            amplitude: 90.0,
        },
        Blob {
            cx: 400.0,
            cy: 120.0,
            sigma_x: 16.0,
            sigma_y: 7.0,
            angle: -0.9,
            amplitude: 120.0,
        },
    ];

    // Sky background with read noise.
    let mut pixels = vec![0.0f32; WIDTH * HEIGHT];
    for y in 0..HEIGHT {
        for x in 0..WIDTH {
            let signal: f64 = blobs
                .iter()
                .map(|b| b.value_at(x as f64, y as f64))
                .sum();
            pixels[y * WIDTH + x] = (30.0 + signal + rng.gauss(0.0, 4.0)) as f32;
        }
    }

    // Foreground stars: single hot pixels with small halos.
    for _ in 0..60 {
        let sx = (rng.next_f64() * WIDTH as f64) as usize;
        let sy = (rng.next_f64() * HEIGHT as f64) as usize;
        let star = Blob {
            cx: sx as f64,
            cy: sy as f64,
            sigma_x: 1.2,
            sigma_y: 1.2,
            angle: 0.0,
            amplitude: 100.0 + rng.next_f64() * 500.0,
        };
        let x0 = sx.saturating_sub(4);
        let y0 = sy.saturating_sub(4);
        for y in y0..(sy + 5).min(HEIGHT) {
            for x in x0..(sx + 5).min(WIDTH) {
                pixels[y * WIDTH + x] += star.value_at(x as f64, y as f64) as f32;
            }
        }
    }

    let hdu = Hdu::new(&[WIDTH, HEIGHT], pixels);
    Fits::create(&out, hdu).with_context(|| format!("writing {out}"))?;

    println!("wrote {WIDTH}×{HEIGHT} sample image to {out}");
    Ok(())
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}
