//! Document template compiler.
//!
//! Produces the self-contained HTML the rendering engine consumes. The
//! question/answer pairing is deliberately deferred: the compiler embeds the
//! two JSON payloads verbatim inside an inline script, and that script pairs
//! selections to questions when the page is loaded by the rendering engine.
//! The compiler itself never parses the payloads, so malformed JSON only
//! surfaces at render time.

use crate::questionnaire::rating::{RiskBand, RISK_BANDS};

/// Inputs for one compilation. The JSON payloads are opaque strings; the
/// caller is responsible for [`html_encode`]-ing them before interpolation.
#[derive(Debug, Clone)]
pub struct TemplateParams {
    pub risk_rating: String,
    pub questions_json: String,
    pub answers_json: String,
    pub date: String,
}

const UNKNOWN_BAND: RiskBand = RiskBand {
    label: "Unknown",
    short_label: "",
    description: "",
};

/// The table is keyed by the literal string forms "1".."5"; nothing is
/// parsed or normalized, so "03" or " 3 " are unknown, exactly like any
/// other stray input.
fn band_index(rating: &str) -> Option<usize> {
    match rating {
        "1" => Some(1),
        "2" => Some(2),
        "3" => Some(3),
        "4" => Some(4),
        "5" => Some(5),
        _ => None,
    }
}

/// Band lookup. Anything outside the five literal keys degrades to the
/// Unknown sentinel rather than failing; an unscored session still gets a
/// document.
fn band_for(rating: &str) -> &'static RiskBand {
    match band_index(rating) {
        Some(value) => &RISK_BANDS[value - 1],
        None => &UNKNOWN_BAND,
    }
}

/// The five-segment scale bar. Segments before the rating are styled
/// "below", the rating's own segment "active", later ones unstyled. An
/// unknown rating leaves all five unstyled.
fn scale_segments(rating: &str) -> String {
    let active = band_index(rating);

    let mut markup = String::new();
    for (index, band) in RISK_BANDS.iter().enumerate() {
        let position = index + 1;
        let class = match active {
            Some(active) if position < active => "scale-segment below",
            Some(active) if position == active => "scale-segment active",
            _ => "scale-segment",
        };
        markup.push_str(&format!(
            "<div class=\"{class}\"><span class=\"scale-label\">{}</span></div>",
            band.short_label
        ));
    }
    markup
}

/// Compile the report markup. Deterministic: identical params yield
/// byte-identical output.
pub fn compile(params: &TemplateParams) -> String {
    let band = band_for(&params.risk_rating);

    TEMPLATE
        .replace("{{risk_label}}", band.label)
        .replace("{{risk_description}}", band.description)
        .replace("{{scale_segments}}", &scale_segments(&params.risk_rating))
        .replace("{{risk_rating}}", &params.risk_rating)
        .replace("{{date}}", &params.date)
        .replace("{{questions_json}}", &params.questions_json)
        .replace("{{answers_json}}", &params.answers_json)
}

/// Escape free text for interpolation into the inline script: apostrophes
/// become an HTML entity (decoded later by the innerHTML assignment) and
/// double quotes are backslash-escaped so the single-quoted JS literal
/// still parses as JSON.
pub fn html_encode(input: &str) -> String {
    input.replace('\'', "&#39;").replace('"', "\\\"")
}

const TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <link href="https://fonts.googleapis.com/css2?family=Roboto:wght@300;400;700&display=swap" rel="stylesheet">
  <style>
    :root {
      --navy: #18263a;
      --dark-navy: #22384f;
      --teal: #9de6e4;
      --cream: #fff5e6;
      --coral: #f0645a;
      --grey: #8c9097;
      --light-grey: #eeeeee;
      --divider: #dddddd;
    }

    * { margin: 0; padding: 0; box-sizing: border-box; }

    body {
      font-family: 'Roboto', sans-serif;
      color: var(--navy);
      font-size: 12px;
      line-height: 1.5;
    }

    .page {
      page-break-after: always;
      padding: 0;
      min-height: 100%;
    }
    .page:last-child { page-break-after: auto; }

    /* Page 1 */
    .accent-top { height: 4px; background: var(--teal); }
    .accent-bottom { height: 4px; background: var(--teal); margin-top: 40px; }

    h1 {
      font-family: Georgia, serif;
      font-size: 24px;
      font-weight: normal;
      color: var(--navy);
      margin: 24px 0 16px;
    }

    .results-box {
      background: var(--light-grey);
      border-radius: 8px;
      padding: 24px;
      display: flex;
      gap: 24px;
      margin-bottom: 20px;
    }

    .rating-circle {
      width: 80px;
      height: 80px;
      border-radius: 50%;
      background: var(--teal);
      display: flex;
      flex-direction: column;
      align-items: center;
      justify-content: center;
      color: var(--navy);
      flex-shrink: 0;
    }

    .rating-number {
      font-size: 32px;
      font-weight: 700;
      line-height: 1;
    }

    .rating-of {
      font-size: 11px;
      color: var(--dark-navy);
    }

    .rating-info h2 {
      font-family: Georgia, serif;
      font-size: 18px;
      font-weight: normal;
      color: var(--navy);
      margin-bottom: 8px;
    }

    .rating-info p {
      color: var(--grey);
      font-size: 13px;
    }

    .risk-scale {
      display: flex;
      gap: 4px;
      margin-top: 20px;
    }

    .scale-segment {
      flex: 1;
      height: 28px;
      border-radius: 4px;
      background: var(--light-grey);
      display: flex;
      align-items: center;
      justify-content: center;
    }

    .scale-segment.below { background: var(--cream); }
    .scale-segment.active { background: var(--teal); font-weight: 700; }

    .scale-label {
      font-size: 9px;
      color: var(--navy);
    }

    .info-box {
      background: rgba(157, 230, 228, 0.15);
      border-left: 4px solid var(--teal);
      border-radius: 4px;
      padding: 12px 16px;
      font-size: 12px;
      color: var(--navy);
      margin-top: 20px;
    }

    .date-line {
      color: var(--grey);
      font-size: 11px;
      margin-top: 16px;
    }

    /* Pages 2 & 3 */
    .report-header {
      font-family: Georgia, serif;
      font-size: 18px;
      color: var(--navy);
      padding-bottom: 8px;
      border-bottom: 2px solid var(--teal);
      margin-bottom: 16px;
    }

    h3 {
      font-size: 14px;
      font-weight: 700;
      color: var(--navy);
      margin-bottom: 8px;
    }

    h5 {
      font-size: 12px;
      font-weight: 700;
      color: var(--grey);
      margin-bottom: 12px;
    }

    .question-list {
      padding-left: 20px;
      list-style: none;
    }

    .question-list li {
      margin-bottom: 14px;
    }

    .question-text {
      font-weight: 700;
      font-size: 12px;
      margin-bottom: 4px;
    }

    .question-number {
      color: var(--grey);
      margin-right: 4px;
    }

    .answer-option {
      display: flex;
      align-items: center;
      gap: 6px;
      margin: 2px 0;
      font-size: 11px;
    }

    .radio-circle {
      width: 12px;
      height: 12px;
      border-radius: 50%;
      border: 2px solid var(--grey);
      flex-shrink: 0;
    }

    .radio-circle.selected {
      border-color: var(--teal);
      background: var(--teal);
    }

    .page-footer {
      color: var(--grey);
      font-size: 10px;
      text-align: right;
      margin-top: 24px;
      padding-top: 8px;
      border-top: 1px solid var(--divider);
    }

    @page {
      size: A4;
      margin: 1in;
    }

    @media print {
      body { -webkit-print-color-adjust: exact; print-color-adjust: exact; }
      .page { page-break-after: always; }
    }
  </style>
</head>
<body>
  <!-- Page 1: Results Summary -->
  <div class="page">
    <div class="accent-top"></div>
    <h1>Your Attitude to Risk Results</h1>
    <div class="results-box">
      <div class="rating-circle">
        <span class="rating-number">{{risk_rating}}</span>
        <span class="rating-of">of 5</span>
      </div>
      <div class="rating-info">
        <h2>Your attitude to risk is {{risk_label}} Risk</h2>
        <p>{{risk_description}}</p>
      </div>
    </div>
    <div class="risk-scale">{{scale_segments}}</div>
    <div class="info-box">
      Please email this document to your Financial Adviser so they can discuss your risk profile and recommend an appropriate investment strategy.
    </div>
    <p class="date-line">Generated on {{date}}</p>
    <div class="accent-bottom"></div>
  </div>

  <!-- Page 2: Questions 1 to 7 -->
  <div class="page">
    <div class="report-header">Risk Profiler Report</div>
    <h3>Your questions and answers:</h3>
    <h5>Questions 1 to 7 of 13</h5>
    <ol class="question-list first-section" start="1"></ol>
    <div class="page-footer">Page 2 of 3</div>
  </div>

  <!-- Page 3: Questions 8 to 13 -->
  <div class="page">
    <div class="report-header">Risk Profiler Report</div>
    <h3>Your questions and answers (continued):</h3>
    <h5>Questions 8 to 13 of 13</h5>
    <ol class="question-list second-section" start="8"></ol>
    <div class="page-footer">Page 3 of 3</div>
  </div>

  <script>
    (function() {
      var questionsData = JSON.parse('{{questions_json}}');
      var answersData = JSON.parse('{{answers_json}}');

      var answersMap = {};
      answersData.forEach(function(a) {
        answersMap[String(a.questionId)] = String(a.responseId);
      });

      function buildQuestionHtml(q) {
        var selectedId = answersMap[q.id];
        var html = '<li><div class="question-text"><span class="question-number">' + q.id + '.</span>' + q.text + '</div>';
        q.answers.forEach(function(a) {
          var isSelected = a.id === selectedId;
          html += '<div class="answer-option">';
          html += '<div class="radio-circle' + (isSelected ? ' selected' : '') + '"></div>';
          html += '<span>' + a.text + '</span>';
          html += '</div>';
        });
        html += '</li>';
        return html;
      }

      var firstHtml = '';
      var secondHtml = '';
      questionsData.forEach(function(q) {
        if (Number(q.id) <= 7) {
          firstHtml += buildQuestionHtml(q);
        } else {
          secondHtml += buildQuestionHtml(q);
        }
      });

      document.querySelector('.first-section').innerHTML = firstHtml;
      document.querySelector('.second-section').innerHTML = secondHtml;
    })();
  </script>
</body>
</html>"##;
