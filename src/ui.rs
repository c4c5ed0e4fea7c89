use crate::models::Kind;
use crate::state::PageTracker;

pub fn render_index(tracker: &PageTracker) -> String {
    let form = tracker.dom().form();
    let rows: String = tracker
        .dom()
        .rows()
        .iter()
        .map(|row| row.html.as_str())
        .collect();
    let (cadence_row, elevation_row) = match form.kind {
        Kind::Running => ("form__row", "form__row form__row--hidden"),
        Kind::Cycling => ("form__row form__row--hidden", "form__row"),
    };
    let map_status = if tracker.map_sync().is_ready() {
        format!("{} markers on the map", tracker.map_sync().marker_count())
    } else {
        "Map unavailable until a position is known".to_string()
    };

    INDEX_HTML
        .replace("{{FORM_CLASS}}", if form.visible { "form" } else { "form hidden" })
        .replace("{{RUNNING_SELECTED}}", selected(form.kind == Kind::Running))
        .replace("{{CYCLING_SELECTED}}", selected(form.kind == Kind::Cycling))
        .replace("{{CADENCE_ROW}}", cadence_row)
        .replace("{{ELEVATION_ROW}}", elevation_row)
        .replace("{{MAP_STATUS}}", &map_status)
        .replace("{{ROWS}}", &rows)
}

fn selected(yes: bool) -> &'static str {
    if yes { "selected" } else { "" }
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Workout Map</title>
  <style>
    :root {
      --color-brand--1: #ffb545;
      --color-brand--2: #00c46a;
      --color-dark--1: #2d3439;
      --color-dark--2: #42484d;
      --color-light--2: #ececec;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      font-family: "Manrope", "Trebuchet MS", sans-serif;
      color: var(--color-light--2);
      background: var(--color-dark--1);
      padding: 32px 18px;
    }

    .workouts {
      list-style: none;
      padding: 0;
      max-width: 520px;
      display: grid;
      gap: 14px;
    }

    .workout {
      background: var(--color-dark--2);
      border-radius: 5px;
      padding: 14px 22px;
      display: grid;
      grid-template-columns: 1fr 1fr 1fr 1fr;
      gap: 8px 24px;
    }

    .workout--running {
      border-left: 5px solid var(--color-brand--2);
    }

    .workout--cycling {
      border-left: 5px solid var(--color-brand--1);
    }

    .workout__title {
      font-size: 1.1rem;
      grid-column: 1 / -1;
      display: flex;
      justify-content: space-between;
    }

    .form {
      background: var(--color-dark--2);
      border-radius: 5px;
      padding: 14px 22px;
      display: grid;
      grid-template-columns: 1fr 1fr;
      gap: 8px 24px;
    }

    .hidden,
    .form__row--hidden {
      display: none;
    }

    .map-status {
      color: #aaa;
      font-size: 0.9rem;
    }
  </style>
</head>
<body>
  <p class="map-status">{{MAP_STATUS}}</p>
  <ul class="workouts">
    <form class="{{FORM_CLASS}}">
      <div class="form__row">
        <label class="form__label">Type</label>
        <select class="form__input form__input--type">
          <option value="running" {{RUNNING_SELECTED}}>Running</option>
          <option value="cycling" {{CYCLING_SELECTED}}>Cycling</option>
        </select>
      </div>
      <div class="form__row">
        <label class="form__label">Distance</label>
        <input class="form__input form__input--distance" placeholder="km" />
      </div>
      <div class="form__row">
        <label class="form__label">Duration</label>
        <input class="form__input form__input--duration" placeholder="min" />
      </div>
      <div class="{{CADENCE_ROW}}">
        <label class="form__label">Cadence</label>
        <input class="form__input form__input--cadence" placeholder="step/min" />
      </div>
      <div class="{{ELEVATION_ROW}}">
        <label class="form__label">Elev Gain</label>
        <input class="form__input form__input--elevation" placeholder="meters" />
      </div>
      <button class="form__btn">OK</button>
    </form>
{{ROWS}}  </ul>
  <script>
    const form = document.querySelector('.form');
    const field = (name) => document.querySelector(`.form__input--${name}`);

    const send = async (method, url, body) => {
      const response = await fetch(url, {
        method,
        headers: { 'Content-Type': 'application/json' },
        body: body === undefined ? undefined : JSON.stringify(body),
      });
      if (!response.ok) {
        alert(await response.text());
        return false;
      }
      window.location.reload();
      return true;
    };

    field('type').addEventListener('change', (event) =>
      send('POST', '/api/form/type', { kind: event.target.value })
    );

    form.addEventListener('submit', (event) => {
      event.preventDefault();
      const number = (name) => (field(name).value === '' ? null : +field(name).value);
      send('POST', '/api/form/submit', {
        kind: field('type').value,
        distance: number('distance'),
        duration: number('duration'),
        cadence: number('cadence'),
        elevation: number('elevation'),
      });
    });

    document.querySelector('.workouts').addEventListener('click', (event) => {
      const row = event.target.closest('.workout');
      if (!row) return;
      if (event.target.closest('.remove-btn')) {
        send('DELETE', `/api/activities/${row.dataset.id}`);
      } else {
        send('POST', `/api/rows/${row.dataset.id}/locate`);
      }
    });
  </script>
</body>
</html>
"#;
