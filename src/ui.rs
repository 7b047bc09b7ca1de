use crate::calendar::{MAX_YEAR, MIN_YEAR, MONTH_NAMES, MonthRef};
use crate::dashboard::{DashboardView, GoalTableView};
use crate::models::GoalField;

pub fn render_dashboard(view: &DashboardView) -> String {
    let month = MonthRef {
        year: view.year,
        month: view.month,
    };
    let cards = [
        card(
            "Agendamentos realizados",
            &view.actuals.appointments_made.to_string(),
            &view.goal.appointments_goal.to_string(),
            view.progress.appointments,
        ),
        card(
            "Avaliações geradas",
            &view.actuals.evaluations_generated.to_string(),
            &view.goal.evaluations_goal.to_string(),
            view.progress.evaluations,
        ),
        card(
            "Vendas fechadas",
            &view.actuals.sales_closed.to_string(),
            &view.goal.sales_goal.to_string(),
            view.progress.sales,
        ),
        card(
            "Faturamento atual",
            &currency(view.actuals.revenue),
            &currency(view.goal.monthly_revenue_goal),
            view.progress.revenue,
        ),
        card(
            "Ticket médio",
            &currency(view.average_ticket),
            &currency(view.goal.average_ticket_goal),
            view.progress.average_ticket,
        ),
    ]
    .concat();

    DASHBOARD_HTML
        .replace("{{STYLE}}", STYLE)
        .replace("{{LABEL}}", &view.label)
        .replace(
            "{{PREV}}",
            &nav_link(month_link(month.previous()), "Mês anterior", "‹"),
        )
        .replace(
            "{{NEXT}}",
            &nav_link(month_link(month.next()), "Próximo mês", "›"),
        )
        .replace("{{CURRENT}}", &period_link(month))
        .replace("{{YEAR}}", &view.year.to_string())
        .replace("{{BUSINESS_DAYS}}", &view.remaining_business_days.to_string())
        .replace("{{CARDS}}", &cards)
        .replace("{{NOTICES}}", &notices(&view.notices))
}

pub fn render_settings(view: &GoalTableView, saved: bool) -> String {
    let rows: String = view
        .goals
        .iter()
        .map(|record| {
            let inputs: String = GoalField::ALL
                .into_iter()
                .map(|field| {
                    let step = if field.is_integer() { "1" } else { "0.01" };
                    format!(
                        r#"<td><input type="number" min="0" step="{step}" name="goal-{month}-{field}" value="{value}" /></td>"#,
                        month = record.month,
                        value = record.value(field),
                    )
                })
                .collect();
            format!(
                "<tr><th>{}</th>{inputs}</tr>\n",
                MONTH_NAMES[record.month as usize % 12]
            )
        })
        .collect();

    let mut messages = notices(&view.notices);
    if saved {
        messages.push_str(r#"<div class="notice ok">Metas salvas.</div>"#);
    }

    SETTINGS_HTML
        .replace("{{STYLE}}", STYLE)
        .replace("{{YEAR}}", &view.year.to_string())
        .replace(
            "{{PREV_YEAR}}",
            &nav_link(year_link(view.year - 1), "Ano anterior", "‹"),
        )
        .replace(
            "{{NEXT_YEAR}}",
            &nav_link(year_link(view.year + 1), "Próximo ano", "›"),
        )
        .replace("{{ROWS}}", &rows)
        .replace("{{NOTICES}}", &messages)
}

fn card(title: &str, actual: &str, goal: &str, progress: Option<f64>) -> String {
    let (percent, width) = match progress {
        Some(ratio) => (format!("{ratio:.1}%"), ratio.clamp(0.0, 100.0)),
        None => ("Meta não definida".to_string(), 0.0),
    };
    format!(
        r#"<div class="stat">
        <span class="label">{title}</span>
        <span class="value">{actual}</span>
        <span class="goal">Meta: {goal} · {percent}</span>
        <div class="bar"><div style="width: {width:.0}%"></div></div>
      </div>
"#
    )
}

fn notices(messages: &[String]) -> String {
    messages
        .iter()
        .map(|message| {
            format!(
                r#"<div class="notice error"><span>{}</span><button type="button" onclick="this.parentElement.remove()">×</button></div>"#,
                escape(message)
            )
        })
        .collect()
}

fn period_link(month: MonthRef) -> String {
    format!("/?year={}&month={}", month.year, month.month)
}

/// Link to `month` if the server would accept it.
fn month_link(month: MonthRef) -> Option<String> {
    MonthRef::new(month.year, month.month).map(period_link)
}

fn year_link(year: i32) -> Option<String> {
    (MIN_YEAR..=MAX_YEAR)
        .contains(&year)
        .then(|| format!("/settings?year={year}"))
}

/// Navigation arrow, or an empty slot when there is nowhere to go.
fn nav_link(href: Option<String>, label: &str, arrow: &str) -> String {
    match href {
        Some(href) => {
            format!(r#"<a class="button" href="{href}" aria-label="{label}">{arrow}</a>"#)
        }
        None => r#"<span class="button disabled"></span>"#.to_string(),
    }
}

fn currency(value: f64) -> String {
    format!("R$ {value:.2}")
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

const STYLE: &str = r#"
    :root {
      --bg: #f4f6f8;
      --ink: #1f2933;
      --muted: #6b7785;
      --accent: #0f766e;
      --danger: #b42318;
      --card: #ffffff;
    }
    * { box-sizing: border-box; }
    body {
      margin: 0;
      background: var(--bg);
      color: var(--ink);
      font-family: "Inter", "Segoe UI", sans-serif;
      padding: 32px 18px 48px;
    }
    .app { width: min(1040px, 100%); margin: 0 auto; display: grid; gap: 24px; }
    header { display: flex; flex-wrap: wrap; align-items: center; justify-content: space-between; gap: 12px; }
    h1 { margin: 0; font-size: 1.9rem; }
    nav { display: flex; align-items: center; gap: 8px; }
    nav .period { font-weight: 600; min-width: 150px; text-align: center; }
    a.button, button.primary {
      border: 1px solid rgba(31, 41, 51, 0.15);
      border-radius: 8px;
      padding: 8px 14px;
      background: var(--card);
      color: var(--ink);
      text-decoration: none;
      font-weight: 600;
      cursor: pointer;
    }
    button.primary { background: var(--accent); color: white; border: none; }
    .button.disabled { visibility: hidden; }
    .grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(240px, 1fr)); gap: 16px; }
    .stat {
      background: var(--card);
      border-radius: 12px;
      padding: 18px;
      border: 1px solid rgba(31, 41, 51, 0.08);
      display: grid;
      gap: 6px;
    }
    .stat .label { font-size: 0.85rem; color: var(--muted); }
    .stat .value { font-size: 1.7rem; font-weight: 700; }
    .stat .goal { font-size: 0.8rem; color: var(--muted); }
    .bar { height: 6px; border-radius: 3px; background: rgba(15, 118, 110, 0.12); overflow: hidden; }
    .bar div { height: 100%; background: var(--accent); }
    .notice {
      display: flex;
      justify-content: space-between;
      align-items: center;
      border-radius: 8px;
      padding: 10px 14px;
    }
    .notice.error { background: #fde8e7; color: var(--danger); }
    .notice.ok { background: #e3f6f1; color: var(--accent); }
    .notice button { border: none; background: transparent; color: inherit; font-size: 1.1rem; cursor: pointer; }
    table { width: 100%; border-collapse: collapse; background: var(--card); border-radius: 12px; }
    th, td { padding: 8px; text-align: left; border-bottom: 1px solid rgba(31, 41, 51, 0.06); }
    td input { width: 100%; padding: 6px 8px; border: 1px solid rgba(31, 41, 51, 0.2); border-radius: 6px; }
    .actions { display: flex; justify-content: flex-end; }
"#;

const DASHBOARD_HTML: &str = r#"<!DOCTYPE html>
<html lang="pt-BR">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Dashboard de Vendas</title>
  <style>{{STYLE}}</style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Dashboard de Vendas</h1>
      <nav>
        {{PREV}}
        <span class="period">{{LABEL}}</span>
        {{NEXT}}
        <a class="button" href="{{CURRENT}}">Atualizar dados</a>
        <a class="button" href="/settings?year={{YEAR}}">Configurações</a>
      </nav>
    </header>
    {{NOTICES}}
    <section class="grid">
      <div class="stat">
        <span class="label">Dias úteis restantes</span>
        <span class="value">{{BUSINESS_DAYS}}</span>
        <span class="goal">Incluindo sábados</span>
      </div>
      {{CARDS}}
    </section>
  </main>
</body>
</html>
"#;

const SETTINGS_HTML: &str = r#"<!DOCTYPE html>
<html lang="pt-BR">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Configurações</title>
  <style>{{STYLE}}</style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Metas mensais</h1>
      <nav>
        {{PREV_YEAR}}
        <span class="period">{{YEAR}}</span>
        {{NEXT_YEAR}}
        <a class="button" href="/">Voltar para o Dashboard</a>
      </nav>
    </header>
    {{NOTICES}}
    <form method="post" action="/settings?year={{YEAR}}">
      <table>
        <thead>
          <tr>
            <th>Mês</th>
            <th>Faturamento (R$)</th>
            <th>Ticket médio (R$)</th>
            <th>Agendamentos</th>
            <th>Avaliações</th>
            <th>Vendas</th>
          </tr>
        </thead>
        <tbody>
{{ROWS}}
        </tbody>
      </table>
      <p class="actions"><button class="primary" type="submit">Salvar metas</button></p>
    </form>
  </main>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::goals::build_default_table;
    use crate::models::{ActualsSnapshot, GoalRecord};
    use crate::progress::ProgressReport;

    #[test]
    fn settings_page_has_an_input_per_field_and_month() {
        let view = GoalTableView {
            year: 2024,
            goals: build_default_table(2024),
            notices: vec!["goals <webhook> failed".to_string()],
        };
        let html = render_settings(&view, true);

        assert_eq!(html.matches("<input ").count(), 60);
        assert!(html.contains(r#"name="goal-11-salesGoal""#));
        assert!(html.contains("goals &lt;webhook&gt; failed"));
        assert!(html.contains("Metas salvas."));
    }

    #[test]
    fn dashboard_page_marks_undefined_goals() {
        let actuals = ActualsSnapshot {
            revenue: 7500.0,
            sales_closed: 15,
            ..Default::default()
        };
        let goal = GoalRecord {
            monthly_revenue_goal: 10000.0,
            ..GoalRecord::zeroed(2024, 0)
        };
        let view = DashboardView {
            year: 2024,
            month: 0,
            label: "Janeiro 2024".to_string(),
            remaining_business_days: 4,
            average_ticket: actuals.average_ticket(),
            progress: ProgressReport::compute(&actuals, &goal),
            actuals,
            goal,
            notices: Vec::new(),
        };
        let html = render_dashboard(&view);

        assert!(html.contains("Janeiro 2024"));
        assert!(html.contains("/?year=2023&month=11"));
        assert!(html.contains("R$ 7500.00"));
        assert!(html.contains("75.0%"));
        assert!(html.contains("Meta não definida"));
    }

    #[test]
    fn settings_navigation_stops_at_supported_years() {
        let view = GoalTableView {
            year: MIN_YEAR,
            goals: build_default_table(MIN_YEAR),
            notices: Vec::new(),
        };
        let html = render_settings(&view, false);
        assert!(!html.contains(&format!("/settings?year={}", MIN_YEAR - 1)));
        assert!(html.contains(&format!("/settings?year={}", MIN_YEAR + 1)));

        let view = GoalTableView {
            year: MAX_YEAR,
            goals: build_default_table(MAX_YEAR),
            notices: Vec::new(),
        };
        let html = render_settings(&view, false);
        assert!(!html.contains(&format!("/settings?year={}", MAX_YEAR + 1)));
        assert!(html.contains(&format!("/settings?year={}", MAX_YEAR - 1)));
    }

    #[test]
    fn month_links_skip_unsupported_years() {
        assert_eq!(month_link(MonthRef::new(MIN_YEAR, 0).unwrap().previous()), None);
        assert_eq!(
            month_link(MonthRef::new(MAX_YEAR, 11).unwrap().previous()),
            Some(format!("/?year={MAX_YEAR}&month=10"))
        );
        assert_eq!(month_link(MonthRef::new(MAX_YEAR, 11).unwrap().next()), None);
    }
}
