//Idcodes
//Copyright (C) 2024 The idcodes developers
//
//This program is free software: you can redistribute it and/or modify
//it under the terms of the GNU Affero General Public License as published by
//the Free Software Foundation, either version 3 of the License, or
//(at your option) any later version.
//
//This program is distributed in the hope that it will be useful,
//but WITHOUT ANY WARRANTY; without even the implied warranty of
//MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//GNU Affero General Public License for more details.
//
//You should have received a copy of the GNU Affero General Public License
//along with this program.  If not, see <http://www.gnu.org/licenses/>.

use std::fmt;
use std::time::Duration;

use crate::PEAK_ALLOC;

/// Implements a bunch of statistics that are collected during a run
#[derive(Default)]
pub struct Statistics<const B: bool> {
    oracle_calls: usize,
    number_sat: usize,
    number_unsat: usize,
    oracle_time: Duration,
    checker_calls: usize,
    checker_time: Duration,
    revalidated: usize,
}

impl<const B: bool> Statistics<B> {

    pub fn sat(&mut self, time: Duration) {
        if B {
            self.oracle_calls += 1;
            self.number_sat += 1;
            self.oracle_time += time;
        }
    }

    pub fn unsat(&mut self, time: Duration) {
        if B {
            self.oracle_calls += 1;
            self.number_unsat += 1;
            self.oracle_time += time;
        }
    }

    pub fn checker(&mut self, time: Duration) {
        if B {
            self.checker_calls += 1;
            self.checker_time += time;
        }
    }

    pub fn revalidated(&mut self, time: Duration) {
        if B {
            self.oracle_calls += 1;
            self.number_sat += 1;
            self.oracle_time += time;
            self.revalidated += 1;
        }
    }

    pub fn oracle_calls(&self) -> usize {
        self.oracle_calls
    }

    pub fn print(&self) {
        if B {
            println!("{}", self);
        }
    }
}

impl<const B: bool> fmt::Display for Statistics<B> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if B {
            let average = if self.oracle_calls > 0 {
                self.oracle_time.as_secs_f64() / self.oracle_calls as f64
            } else {
                0.0
            };
            writeln!(f,
                "oracle calls {} | #SAT {} | #UNSAT {} | oracle time {:.3}s (avg {:.3}s) | checker time {:.3}s | revalidated {} | peak memory {:.3}MB",
                self.oracle_calls,
                self.number_sat,
                self.number_unsat,
                self.oracle_time.as_secs_f64(),
                average,
                self.checker_time.as_secs_f64(),
                self.revalidated,
                PEAK_ALLOC.peak_usage_as_mb())
        } else {
            write!(f, "")
        }
    }
}
