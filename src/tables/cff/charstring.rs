//! Type 2 charstring interpreter: a stack machine with a
//! bounded operand stack (48) and call stack (10), producing cubic-Bézier
//! path segments through [`OutlineBuilder`].

use crate::error::CffError;
use crate::ids::Rect;
use crate::outline::OutlineBuilder;

use super::index::Index;

const STACK_LIMIT: usize = 48;
const CALL_STACK_LIMIT: usize = 10;

/// Subroutine index bias: applied to the operand popped for
/// `callsubr`/`callgsubr` before indexing into the subroutine INDEX.
pub fn subr_bias(count: u32) -> i32 {
    if count < 1240 {
        107
    } else if count < 33900 {
        1131
    } else {
        32768
    }
}

pub struct CharstringInterpreter<'a, 'b> {
    stack: arrayvec::ArrayVec<f32, STACK_LIMIT>,
    call_depth: usize,
    global_subrs: Index<'a>,
    local_subrs: Index<'a>,
    global_bias: i32,
    local_bias: i32,
    builder: &'b mut dyn OutlineBuilder,
    x: f32,
    y: f32,
    stem_count: u32,
    has_width: bool,
    path_open: bool,
    had_move: bool,
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl<'a, 'b> CharstringInterpreter<'a, 'b> {
    pub fn new(global_subrs: Index<'a>, local_subrs: Index<'a>, builder: &'b mut dyn OutlineBuilder) -> Self {
        CharstringInterpreter {
            stack: arrayvec::ArrayVec::new(),
            call_depth: 0,
            global_subrs,
            local_subrs,
            global_bias: subr_bias(global_subrs.len()),
            local_bias: subr_bias(local_subrs.len()),
            builder,
            x: 0.0,
            y: 0.0,
            stem_count: 0,
            has_width: false,
            path_open: false,
            had_move: false,
            min_x: f32::MAX,
            min_y: f32::MAX,
            max_x: f32::MIN,
            max_y: f32::MIN,
        }
    }

    pub fn run(mut self, charstring: &'a [u8]) -> Result<Rect, CffError> {
        let _ended_on_endchar = self.exec(charstring)?;
        if !self.had_move {
            return Err(CffError::MissingMoveTo);
        }
        if self.min_x > self.max_x {
            return Err(CffError::ZeroBBox);
        }
        Ok(Rect {
            x_min: to_i16(self.min_x)?,
            y_min: to_i16(self.min_y)?,
            x_max: to_i16(self.max_x)?,
            y_max: to_i16(self.max_y)?,
        })
    }

    /// Executes one charstring (or subroutine body), returning `true` if it
    /// ended on an `endchar`/implicit-end (so the caller should stop too)
    /// and `false` if it ended on a plain `return` (resume the caller).
    fn exec(&mut self, data: &'a [u8]) -> Result<bool, CffError> {
        let mut pos = 0usize;
        while pos < data.len() {
            let b0 = data[pos];
            if b0 >= 32 || b0 == 28 {
                pos += self.push_operand(&data[pos..])?;
                continue;
            }

            pos += 1;
            match b0 {
                1 | 3 | 18 | 23 => {
                    self.count_stems();
                }
                19 | 20 => {
                    self.count_stems();
                    let bytes = (self.stem_count as usize).div_ceil(8);
                    pos += bytes;
                }
                4 => self.vmoveto()?,
                5 => self.rlineto()?,
                6 => self.hlineto()?,
                7 => self.vlineto()?,
                8 => self.rrcurveto()?,
                10 => {
                    if self.call_subr(false)? {
                        return Ok(true);
                    }
                }
                11 => return Ok(false),
                14 => {
                    self.endchar()?;
                    return Ok(true);
                }
                21 => self.rmoveto()?,
                22 => self.hmoveto()?,
                24 => self.rcurveline()?,
                25 => self.rlinecurve()?,
                26 => self.vvcurveto()?,
                27 => self.hhcurveto()?,
                29 => {
                    if self.call_subr(true)? {
                        return Ok(true);
                    }
                }
                30 => self.vhcurveto()?,
                31 => self.hvcurveto()?,
                12 => {
                    let b1 = *data.get(pos).ok_or(CffError::InvalidOperator)?;
                    pos += 1;
                    self.flex(b1)?;
                }
                _ => return Err(CffError::InvalidOperator),
            }
        }
        Ok(false)
    }

    /// Pops the biased subroutine index, recurses into it, and propagates
    /// whether it ended the charstring via `endchar`.
    fn call_subr(&mut self, global: bool) -> Result<bool, CffError> {
        if self.call_depth >= CALL_STACK_LIMIT {
            return Err(CffError::NestingLimitReached);
        }
        let index = self.pop()? as i32;
        let (table, bias) = if global {
            (self.global_subrs, self.global_bias)
        } else {
            (self.local_subrs, self.local_bias)
        };
        let biased = index + bias;
        if biased < 0 {
            return Err(CffError::InvalidOperator);
        }
        let subr = table.get(biased as u32).ok_or(CffError::InvalidOperator)?;
        self.call_depth += 1;
        let ended = self.exec(subr)?;
        self.call_depth -= 1;
        Ok(ended)
    }

    fn push_operand(&mut self, data: &[u8]) -> Result<usize, CffError> {
        let b0 = data[0];
        let (value, len) = match b0 {
            32..=246 => (b0 as i32 as f32 - 139.0, 1),
            247..=250 => {
                let b1 = *data.get(1).ok_or(CffError::InvalidArgumentsStackLength)?;
                ((b0 as i32 - 247) as f32 * 256.0 + b1 as f32 + 108.0, 2)
            }
            251..=254 => {
                let b1 = *data.get(1).ok_or(CffError::InvalidArgumentsStackLength)?;
                (-((b0 as i32 - 251) as f32) * 256.0 - b1 as f32 - 108.0, 2)
            }
            28 => {
                let bytes = data.get(1..3).ok_or(CffError::InvalidArgumentsStackLength)?;
                (i16::from_be_bytes([bytes[0], bytes[1]]) as f32, 3)
            }
            255 => {
                let bytes = data.get(1..5).ok_or(CffError::InvalidArgumentsStackLength)?;
                let fixed = i32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
                (fixed as f32 / 65536.0, 5)
            }
            _ => return Err(CffError::InvalidOperator),
        };
        self.push(value)?;
        Ok(len)
    }

    fn push(&mut self, value: f32) -> Result<(), CffError> {
        self.stack.try_push(value).map_err(|_| CffError::ArgumentsStackLimitReached)
    }

    fn pop(&mut self) -> Result<f32, CffError> {
        self.stack.pop().ok_or(CffError::InvalidArgumentsStackLength)
    }

    fn count_stems(&mut self) {
        self.stem_count += self.stack.len() as u32 / 2;
        if !self.has_width && self.stack.len() % 2 == 1 {
            self.has_width = true;
        }
        self.stack.clear();
    }

    fn open_path(&mut self) {
        if self.path_open {
            self.builder.close();
        }
        self.builder.move_to(self.x, self.y);
        self.path_open = true;
        self.had_move = true;
        self.track(self.x, self.y);
    }

    fn track(&mut self, x: f32, y: f32) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    fn line_to(&mut self, dx: f32, dy: f32) {
        self.x += dx;
        self.y += dy;
        self.builder.line_to(self.x, self.y);
        self.track(self.x, self.y);
    }

    fn curve_to(&mut self, dx1: f32, dy1: f32, dx2: f32, dy2: f32, dx3: f32, dy3: f32) {
        let x1 = self.x + dx1;
        let y1 = self.y + dy1;
        let x2 = x1 + dx2;
        let y2 = y1 + dy2;
        self.x = x2 + dx3;
        self.y = y2 + dy3;
        self.builder.curve_to(x1, y1, x2, y2, self.x, self.y);
        self.track(x1, y1);
        self.track(x2, y2);
        self.track(self.x, self.y);
    }

    fn consume_width_if_odd(&mut self, expected_parity: usize) {
        if !self.has_width && self.stack.len() % 2 != expected_parity % 2 {
            self.stack.remove(0);
            self.has_width = true;
        }
    }

    fn rmoveto(&mut self) -> Result<(), CffError> {
        self.consume_width_if_odd(2);
        if self.stack.len() < 2 {
            return Err(CffError::InvalidArgumentsStackLength);
        }
        let dy = self.pop()?;
        let dx = self.pop()?;
        self.x += dx;
        self.y += dy;
        self.open_path();
        self.stack.clear();
        Ok(())
    }

    fn hmoveto(&mut self) -> Result<(), CffError> {
        self.consume_width_if_odd(1);
        let dx = self.pop()?;
        self.x += dx;
        self.open_path();
        self.stack.clear();
        Ok(())
    }

    fn vmoveto(&mut self) -> Result<(), CffError> {
        self.consume_width_if_odd(1);
        let dy = self.pop()?;
        self.y += dy;
        self.open_path();
        self.stack.clear();
        Ok(())
    }

    fn rlineto(&mut self) -> Result<(), CffError> {
        let args: Vec<f32> = self.stack.drain(..).collect();
        for pair in args.chunks(2) {
            if pair.len() < 2 {
                return Err(CffError::InvalidArgumentsStackLength);
            }
            self.line_to(pair[0], pair[1]);
        }
        Ok(())
    }

    fn hlineto(&mut self) -> Result<(), CffError> {
        let args: Vec<f32> = self.stack.drain(..).collect();
        for (i, &v) in args.iter().enumerate() {
            if i % 2 == 0 {
                self.line_to(v, 0.0);
            } else {
                self.line_to(0.0, v);
            }
        }
        Ok(())
    }

    fn vlineto(&mut self) -> Result<(), CffError> {
        let args: Vec<f32> = self.stack.drain(..).collect();
        for (i, &v) in args.iter().enumerate() {
            if i % 2 == 0 {
                self.line_to(0.0, v);
            } else {
                self.line_to(v, 0.0);
            }
        }
        Ok(())
    }

    fn rrcurveto(&mut self) -> Result<(), CffError> {
        let args: Vec<f32> = self.stack.drain(..).collect();
        for six in args.chunks(6) {
            if six.len() < 6 {
                return Err(CffError::InvalidArgumentsStackLength);
            }
            self.curve_to(six[0], six[1], six[2], six[3], six[4], six[5]);
        }
        Ok(())
    }

    fn rcurveline(&mut self) -> Result<(), CffError> {
        let args: Vec<f32> = self.stack.drain(..).collect();
        if args.len() < 8 || (args.len() - 2) % 6 != 0 {
            return Err(CffError::InvalidArgumentsStackLength);
        }
        let (curves, line) = args.split_at(args.len() - 2);
        for six in curves.chunks(6) {
            self.curve_to(six[0], six[1], six[2], six[3], six[4], six[5]);
        }
        self.line_to(line[0], line[1]);
        Ok(())
    }

    fn rlinecurve(&mut self) -> Result<(), CffError> {
        let args: Vec<f32> = self.stack.drain(..).collect();
        if args.len() < 6 || (args.len() - 6) % 2 != 0 {
            return Err(CffError::InvalidArgumentsStackLength);
        }
        let (lines, curve) = args.split_at(args.len() - 6);
        for pair in lines.chunks(2) {
            self.line_to(pair[0], pair[1]);
        }
        self.curve_to(curve[0], curve[1], curve[2], curve[3], curve[4], curve[5]);
        Ok(())
    }

    fn vvcurveto(&mut self) -> Result<(), CffError> {
        let mut args: Vec<f32> = self.stack.drain(..).collect();
        let mut dx1 = 0.0;
        if args.len() % 4 == 1 {
            dx1 = args.remove(0);
        }
        for (i, four) in args.chunks(4).enumerate() {
            if four.len() < 4 {
                return Err(CffError::InvalidArgumentsStackLength);
            }
            let leading_dx = if i == 0 { dx1 } else { 0.0 };
            self.curve_to(leading_dx, four[0], four[1], four[2], 0.0, four[3]);
        }
        Ok(())
    }

    fn hhcurveto(&mut self) -> Result<(), CffError> {
        let mut args: Vec<f32> = self.stack.drain(..).collect();
        let mut dy1 = 0.0;
        if args.len() % 4 == 1 {
            dy1 = args.remove(0);
        }
        for (i, four) in args.chunks(4).enumerate() {
            if four.len() < 4 {
                return Err(CffError::InvalidArgumentsStackLength);
            }
            let leading_dy = if i == 0 { dy1 } else { 0.0 };
            self.curve_to(four[0], leading_dy, four[1], four[2], four[3], 0.0);
        }
        Ok(())
    }

    fn vhcurveto(&mut self) -> Result<(), CffError> {
        let args: Vec<f32> = self.stack.drain(..).collect();
        self.alternating_curveto(&args, true)
    }

    fn hvcurveto(&mut self) -> Result<(), CffError> {
        let args: Vec<f32> = self.stack.drain(..).collect();
        self.alternating_curveto(&args, false)
    }

    fn alternating_curveto(&mut self, args: &[f32], mut start_vertical: bool) -> Result<(), CffError> {
        let mut i = 0usize;
        while i + 4 <= args.len() {
            let last = i + 4 >= args.len() - 1 && i + 5 == args.len();
            let extra = if last { args[i + 4] } else { 0.0 };
            if start_vertical {
                self.curve_to(0.0, args[i], args[i + 1], args[i + 2], args[i + 3], extra);
            } else {
                self.curve_to(args[i], 0.0, args[i + 1], args[i + 2], extra, args[i + 3]);
            }
            i += 4;
            start_vertical = !start_vertical;
        }
        Ok(())
    }

    fn flex(&mut self, sub_op: u8) -> Result<(), CffError> {
        let args: Vec<f32> = self.stack.drain(..).collect();
        match sub_op {
            34 => {
                // hflex: dx1 dx2 dy2 dx3 dx4 dx5 dx6
                if args.len() < 7 {
                    return Err(CffError::InvalidArgumentsStackLength);
                }
                let y0 = self.y;
                self.curve_to(args[0], 0.0, args[1], args[2], args[3], 0.0);
                let dy6 = y0 - self.y;
                self.curve_to(args[4], 0.0, args[5], dy6, args[6], 0.0);
            }
            35 => {
                // flex: dx1 dy1 dx2 dy2 dx3 dy3 dx4 dy4 dx5 dy5 dx6 dy6 fd
                if args.len() < 13 {
                    return Err(CffError::InvalidArgumentsStackLength);
                }
                self.curve_to(args[0], args[1], args[2], args[3], args[4], args[5]);
                self.curve_to(args[6], args[7], args[8], args[9], args[10], args[11]);
            }
            36 => {
                // hflex1: dx1 dy1 dx2 dy2 dx3 dx4 dx5 dy5 dx6
                if args.len() < 9 {
                    return Err(CffError::InvalidArgumentsStackLength);
                }
                let y0 = self.y;
                self.curve_to(args[0], args[1], args[2], args[3], args[4], 0.0);
                let dy6 = y0 - self.y - args[7];
                self.curve_to(args[5], 0.0, args[6], args[7], args[8], dy6);
            }
            37 => {
                // flex1: dx1 dy1 dx2 dy2 dx3 dy3 dx4 dy4 dx5 dy5 d6
                if args.len() < 11 {
                    return Err(CffError::InvalidArgumentsStackLength);
                }
                let x0 = self.x;
                let y0 = self.y;
                self.curve_to(args[0], args[1], args[2], args[3], args[4], args[5]);
                let dx_sum = args[0] + args[2] + args[4] + args[6] + args[8];
                let dy_sum = args[1] + args[3] + args[5] + args[7] + args[9];
                if dx_sum.abs() > dy_sum.abs() {
                    self.curve_to(args[6], args[7], args[8], args[9], args[10], y0 - self.y - args[7] - args[9]);
                } else {
                    self.curve_to(args[6], args[7], args[8], args[9], x0 - self.x - args[6] - args[8], args[10]);
                }
            }
            _ => return Err(CffError::InvalidOperator),
        }
        Ok(())
    }

    fn endchar(&mut self) -> Result<(), CffError> {
        if self.stack.len() == 4 {
            // seac-style accent composition is handled by the caller, which
            // re-invokes the interpreter for the base and accent glyphs;
            // here we only validate the operand count and stop.
        } else if !self.stack.is_empty() && self.stack.len() != 4 {
            self.consume_width_if_odd(0);
        }
        if self.path_open {
            self.builder.close();
        } else if !self.had_move {
            return Err(CffError::MissingMoveTo);
        }
        self.path_open = false;
        self.had_move = true;
        Ok(())
    }
}

fn to_i16(value: f32) -> Result<i16, CffError> {
    if value < i16::MIN as f32 || value > i16::MAX as f32 {
        return Err(CffError::BboxOverflow);
    }
    Ok(value as i16)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        moves: Vec<(f32, f32)>,
        lines: Vec<(f32, f32)>,
        curves: Vec<(f32, f32, f32, f32, f32, f32)>,
        closes: u32,
    }

    impl OutlineBuilder for Recorder {
        fn move_to(&mut self, x: f32, y: f32) {
            self.moves.push((x, y));
        }
        fn line_to(&mut self, x: f32, y: f32) {
            self.lines.push((x, y));
        }
        fn quad_to(&mut self, _x1: f32, _y1: f32, x: f32, y: f32) {
            self.lines.push((x, y));
        }
        fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
            self.curves.push((x1, y1, x2, y2, x, y));
        }
        fn close(&mut self) {
            self.closes += 1;
        }
    }

    /// Encodes a small integer (`-107..=107`) as a single Type 2 operand byte.
    fn small(v: i32) -> u8 {
        (v + 139) as u8
    }

    #[test]
    fn subr_bias_follows_the_three_count_bands() {
        assert_eq!(subr_bias(0), 107);
        assert_eq!(subr_bias(1239), 107);
        assert_eq!(subr_bias(1240), 1131);
        assert_eq!(subr_bias(33899), 1131);
        assert_eq!(subr_bias(33900), 32768);
    }

    #[test]
    fn rmoveto_then_rlineto_then_endchar_draws_a_triangle() {
        // moveto(10, 20), lineto(+8, +3) -> (18, 23), endchar.
        let data = [small(10), small(20), 21, small(8), small(3), 5, 14];

        let mut rec = Recorder::default();
        let interp = CharstringInterpreter::new(Index::default(), Index::default(), &mut rec);
        let bbox = interp.run(&data).unwrap();

        assert_eq!(bbox.x_min, 10);
        assert_eq!(bbox.y_min, 20);
        assert_eq!(bbox.x_max, 18);
        assert_eq!(bbox.y_max, 23);
        assert_eq!(rec.moves, vec![(10.0, 20.0)]);
        assert_eq!(rec.lines, vec![(18.0, 23.0)]);
        assert_eq!(rec.closes, 1);
    }

    #[test]
    fn rrcurveto_draws_a_single_cubic_segment() {
        // moveto(0, 0), then one rrcurveto with all-zero deltas except the
        // final on-curve point, endchar.
        let data = [
            small(0),
            small(0),
            21,
            small(0),
            small(10),
            small(10),
            small(0),
            small(0),
            small(-10),
            8,
            14,
        ];

        let mut rec = Recorder::default();
        let interp = CharstringInterpreter::new(Index::default(), Index::default(), &mut rec);
        let bbox = interp.run(&data).unwrap();

        assert_eq!(rec.curves.len(), 1);
        let (x1, y1, x2, y2, x, y) = rec.curves[0];
        assert_eq!((x1, y1), (0.0, 10.0));
        assert_eq!((x2, y2), (10.0, 10.0));
        assert_eq!((x, y), (10.0, 0.0));
        assert_eq!(bbox.y_max, 10);
    }

    #[test]
    fn endchar_without_a_prior_moveto_is_rejected() {
        let data = [14u8];
        let mut rec = Recorder::default();
        let interp = CharstringInterpreter::new(Index::default(), Index::default(), &mut rec);
        assert_eq!(interp.run(&data), Err(CffError::MissingMoveTo));
    }

    #[test]
    fn pushing_past_the_operand_stack_limit_is_rejected() {
        let mut data = Vec::new();
        for _ in 0..(STACK_LIMIT + 1) {
            data.push(small(0));
        }
        let mut rec = Recorder::default();
        let interp = CharstringInterpreter::new(Index::default(), Index::default(), &mut rec);
        assert_eq!(interp.run(&data), Err(CffError::ArgumentsStackLimitReached));
    }

    #[test]
    fn unknown_single_byte_operator_is_rejected() {
        let data = [2u8]; // reserved, not a valid operator
        let mut rec = Recorder::default();
        let interp = CharstringInterpreter::new(Index::default(), Index::default(), &mut rec);
        assert_eq!(interp.run(&data), Err(CffError::InvalidOperator));
    }
}
