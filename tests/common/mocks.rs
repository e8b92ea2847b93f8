//! Mock version of an input stream that fails on read.
use mockall::mock;

use std::io::{self, Read};

mock! {
    pub Source {}
    impl Read for Source {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;
    }
}
