use crate::engine::PixelBuffer;

/// Authenticity call attached to every analysis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Verdict {
    pub is_fake: bool,
    /// Fraction in [0, 1].
    pub confidence: f32,
}

/// Decides the verdict for an analysed image.
///
/// Gets both the decoded input and the computed heatmap so a real classifier
/// can be dropped in without touching the rest of the pipeline.
pub trait VerdictStrategy: Send + Sync {
    fn judge(&self, image: &PixelBuffer, heatmap: &PixelBuffer) -> Verdict;
}

/// Content-independent verdict: always reports the configured values.
///
/// No classifier exists behind it. The default reports "authentic" with zero
/// confidence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaceholderVerdict {
    verdict: Verdict,
}

impl PlaceholderVerdict {
    /// `confidence` is clamped into [0, 1].
    pub fn new(is_fake: bool, confidence: f32) -> PlaceholderVerdict {
        let confidence = if confidence.is_nan() { 0.0 } else { confidence.clamp(0.0, 1.0) };
        PlaceholderVerdict { verdict: Verdict { is_fake, confidence } }
    }
}

impl Default for PlaceholderVerdict {
    fn default() -> Self {
        PlaceholderVerdict::new(false, 0.0)
    }
}

impl VerdictStrategy for PlaceholderVerdict {
    fn judge(&self, _image: &PixelBuffer, _heatmap: &PixelBuffer) -> Verdict {
        self.verdict
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_ignores_content() {
        let v = PlaceholderVerdict::new(true, 0.8);
        let a = PixelBuffer::filled(2, 2, &[0, 0, 0]);
        let b = PixelBuffer::filled(9, 1, &[255]);
        assert_eq!(v.judge(&a, &a), v.judge(&b, &b));
        assert_eq!(v.judge(&a, &a), Verdict { is_fake: true, confidence: 0.8 });
    }

    #[test]
    fn confidence_is_clamped() {
        let img = PixelBuffer::filled(1, 1, &[0]);
        assert_eq!(PlaceholderVerdict::new(false, 3.0).judge(&img, &img).confidence, 1.0);
        assert_eq!(PlaceholderVerdict::new(false, -1.0).judge(&img, &img).confidence, 0.0);
        assert_eq!(PlaceholderVerdict::new(false, f32::NAN).judge(&img, &img).confidence, 0.0);
    }
}
