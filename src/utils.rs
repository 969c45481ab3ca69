use std::io::{self, Read, Write};
use std::time::{SystemTime, UNIX_EPOCH};

#[cfg(test)]
#[path = "utils_test.rs"]
mod utils_test;

/// Extension trait for writing little-endian binary data
pub trait BinaryWrite: Write {
    /// Write a u64 in little-endian format
    #[inline]
    fn write_u64_le(&mut self, val: u64) -> io::Result<()> {
        self.write_all(&val.to_le_bytes())
    }

    /// Write a u32 in little-endian format
    #[inline]
    fn write_u32_le(&mut self, val: u32) -> io::Result<()> {
        self.write_all(&val.to_le_bytes())
    }

    /// Write an i32 in little-endian format
    #[inline]
    fn write_i32_le(&mut self, val: i32) -> io::Result<()> {
        self.write_all(&val.to_le_bytes())
    }

    /// Write a u8 (single byte)
    #[inline]
    fn write_u8_le(&mut self, val: u8) -> io::Result<()> {
        self.write_all(&[val])
    }

    /// Write an array of u64 values in little-endian format
    #[inline]
    fn write_u64_array_le(&mut self, vals: &[u64]) -> io::Result<()> {
        for &val in vals {
            self.write_u64_le(val)?;
        }
        Ok(())
    }
}

/// Blanket implementation for all types that implement Write
impl<W: Write + ?Sized> BinaryWrite for W {}

/// Extension trait for reading little-endian binary data
pub trait BinaryRead: Read {
    #[inline]
    fn read_u64_le(&mut self) -> io::Result<u64> {
        let mut buf = [0u8; 8];
        self.read_exact(&mut buf)?;
        Ok(u64::from_le_bytes(buf))
    }

    #[inline]
    fn read_u32_le(&mut self) -> io::Result<u32> {
        let mut buf = [0u8; 4];
        self.read_exact(&mut buf)?;
        Ok(u32::from_le_bytes(buf))
    }

    #[inline]
    fn read_i32_le(&mut self) -> io::Result<i32> {
        let mut buf = [0u8; 4];
        self.read_exact(&mut buf)?;
        Ok(i32::from_le_bytes(buf))
    }

    #[inline]
    fn read_u8_le(&mut self) -> io::Result<u8> {
        let mut buf = [0u8; 1];
        self.read_exact(&mut buf)?;
        Ok(buf[0])
    }

    /// Read `n` u64 values in little-endian format
    fn read_u64_vec_le(&mut self, n: usize) -> io::Result<Vec<u64>> {
        let mut out = Vec::with_capacity(n);
        for _ in 0..n {
            out.push(self.read_u64_le()?);
        }
        Ok(out)
    }
}

/// Blanket implementation for all types that implement Read
impl<R: Read + ?Sized> BinaryRead for R {}

pub fn realtime() -> f64 {
    let now = SystemTime::now();
    let since_epoch = now.duration_since(UNIX_EPOCH).expect("Time went backwards");
    since_epoch.as_secs_f64()
}

pub fn cputime() -> f64 {
    let rusage = unsafe {
        let mut rusage = std::mem::MaybeUninit::uninit();
        libc::getrusage(libc::RUSAGE_SELF, rusage.as_mut_ptr());
        rusage.assume_init()
    };
    let user_time = rusage.ru_utime;
    let sys_time = rusage.ru_stime;
    (user_time.tv_sec as f64 + user_time.tv_usec as f64 * 1e-6)
        + (sys_time.tv_sec as f64 + sys_time.tv_usec as f64 * 1e-6)
}
